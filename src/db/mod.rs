pub mod db_pool;
pub mod executor;
pub mod registry;
pub mod result_set;
pub mod schema_inspector;
