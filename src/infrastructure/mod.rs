pub mod sqlite_repo;
pub mod update_query;
