pub mod get;
pub mod health;
pub mod incr;
pub mod index;
pub mod set;
pub mod store_health;

pub use get::get_handler;
pub use health::health_handler;
pub use incr::incr_handler;
pub use index::index_handler;
pub use set::set_handler;
pub use store_health::store_health_handler;
