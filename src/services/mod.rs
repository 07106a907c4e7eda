pub mod auth_service;
pub mod mailer;
pub mod notification_service;
pub mod order_service;
pub mod product_service;
pub mod validation_service;
