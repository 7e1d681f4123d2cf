//! Orders

pub mod records;

pub(crate) mod data;
mod repository;

pub(crate) use repository::PgOrdersRepository;
