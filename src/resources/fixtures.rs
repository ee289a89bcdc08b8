//! Sample payloads for each resource, with unique fields randomized.

use rand::Rng;

use super::models::*;
use crate::generators;

impl UserPayload {
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            id: None,
            login: generators::login(rng),
            first_name: "Admin".to_string(),
            last_name: "User".to_string(),
            email: generators::email(rng),
            activated: true,
            lang_key: "en".to_string(),
            authorities: vec!["ROLE_USER".to_string()],
        }
    }
}

impl StaffPayload {
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            id: None,
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: generators::email(rng),
            phone: generators::phone(rng),
            role: StaffRole::Waiter,
            join_date: generators::today(),
            is_active: true,
        }
    }
}

impl CustomerPayload {
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            id: None,
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            email: generators::email(rng),
            phone: generators::phone(rng),
            address_line1: "123 Main St".to_string(),
            city: "Boston".to_string(),
            country: "USA".to_string(),
        }
    }
}

impl MenuItemPayload {
    pub fn sample() -> Self {
        Self {
            id: None,
            name: "Spaghetti Carbonara".to_string(),
            description: Some("Classic Italian pasta dish".to_string()),
            price: 15.99,
            category: MenuCategory::MainCourse,
            spicy_level: Some(SpicyLevel::NotSpicy),
            is_vegetarian: Some(false),
            is_available: true,
        }
    }

    /// Bare item used as an order-item prerequisite.
    pub fn prerequisite() -> Self {
        Self {
            id: None,
            name: "Test Item".to_string(),
            description: None,
            price: 10.99,
            category: MenuCategory::MainCourse,
            spicy_level: None,
            is_vegetarian: None,
            is_available: true,
        }
    }
}

impl OrderPayload {
    pub fn sample() -> Self {
        Self {
            id: None,
            order_date: generators::instant_in_days(0),
            status: OrderStatus::New,
            total_amount: 45.98,
            payment_method: PaymentMethod::CreditCard,
            payment_reference: Some("REF123".to_string()),
            special_instructions: Some("No onions please".to_string()),
        }
    }

    /// Bare cash order used as an order-item prerequisite.
    pub fn prerequisite() -> Self {
        Self {
            id: None,
            order_date: generators::instant_in_days(0),
            status: OrderStatus::New,
            total_amount: 10.99,
            payment_method: PaymentMethod::Cash,
            payment_reference: None,
            special_instructions: None,
        }
    }
}

impl OrderItemPayload {
    pub fn sample(menu_item_id: i64, order_id: i64) -> Self {
        Self {
            id: None,
            quantity: 1,
            notes: Some("Extra cheese".to_string()),
            subtotal: 10.99,
            menu_item: EntityRef { id: menu_item_id },
            order: EntityRef { id: order_id },
        }
    }
}

impl ReservationPayload {
    /// A pending reservation for tomorrow.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            id: None,
            reservation_date: generators::instant_in_days(1),
            party_size: 4,
            status: ReservationStatus::Pending,
            customer_name: "Bob Johnson".to_string(),
            customer_email: generators::email(rng),
            customer_phone: generators::phone(rng),
            special_requests: Some("Window seat preferred".to_string()),
        }
    }
}

impl AuthorityPayload {
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            name: generators::authority_name(rng),
        }
    }
}
