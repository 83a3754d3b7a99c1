//! Data models used throughout the application
//!
//! This module contains the GraphQL wire types, the normalized query outcome,
//! and typed views of the subgraph payloads.

// GraphQL-over-HTTP request/response structures
pub mod graphql;

// Success/failure shape returned by every query
pub mod outcome;

// Typed Uniswap v3 subgraph entities
pub mod subgraph;
