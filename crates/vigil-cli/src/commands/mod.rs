pub mod audit;
pub mod dispatch;
pub mod kinds;
pub mod schema;
