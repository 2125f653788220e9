//! Roomlink joins two endpoints in a peer-to-peer video session brokered by a
//! signaling server.
//!
//! The crate speaks the JSON signaling protocol, drives an external media
//! engine through offer/answer/ICE negotiation, and hands decoded frames to a
//! polling presentation layer. The media engine itself (capture, codecs,
//! ICE/DTLS/SRTP) is supplied by the embedder through the traits in [`media`].

/// Presentation-facing session control and frame polling helpers.
pub mod app;
/// Handles configuration loading and management.
pub mod config;
/// Negotiation state machine, worker thread, session errors and notifications.
pub mod core;
/// Logging utilities for the application.
pub mod log;
/// Boundary to the media engine: traits, frames and frame slots.
pub mod media;
/// Signaling client for communicating with the signaling server.
pub mod signaling_client;
/// TLS (Transport Layer Security) utility functions.
pub mod tls_utils;
