//! A small storefront: a client-side cart and checkout engine, an order
//! gateway that writes through to a REST service and falls back to a local
//! store, and the REST service itself.

pub mod audit;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod db;
pub mod dto;
pub mod entity;
pub mod error;
pub mod gateway;
pub mod local_store;
pub mod models;
pub mod repository;
pub mod response;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
