//! Auction service integrations
//!
//! Implementations of [`voxta_core::AuctionService`]:
//! - [`InMemoryAuctionService`]: seeded in-process inventory (default)
//! - [`HttpAuctionService`]: REST client for the remote auction backend

pub mod factory;
pub mod in_memory;
pub mod integrations;

pub use factory::create_auction_service;
pub use in_memory::InMemoryAuctionService;
pub use integrations::{HttpAuctionService, IntegrationError};
