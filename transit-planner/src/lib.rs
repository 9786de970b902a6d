//! Multi-modal transit journey planner.
//!
//! Plans trips between two coordinates over a rail network and a
//! surface-transit network (bus, minibus, ferry), combining walks, rail
//! rides along the station graph, surface rides and changes between the
//! two at interchanges.

pub mod config;
pub mod domain;
pub mod geo;
pub mod graph;
pub mod interchange;
pub mod planner;
pub mod sources;
pub mod transit_data;
pub mod web;
