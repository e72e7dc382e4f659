//! Metadata value contract for metamap.
//!
//! A metadata value is a self-describing payload attached to a host object
//! under a name. This crate defines what every value kind must support and
//! ships the built-in kinds.
//!
//! # Key Types
//!
//! - [`Metadata`] — Object-safe value contract: copy, type tag, framed
//!   read/write, display
//! - [`MetaValue`] / [`TypedMetadata`] — Plain Rust payloads lifted into
//!   [`Metadata`]
//! - [`UnknownMetadata`] — Opaque fallback that preserves an unreadable
//!   payload's bytes
//! - [`wire`] — Little-endian length-prefixed primitives

pub mod error;
pub mod metadata;
pub mod typed;
pub mod unknown;
pub mod wire;

pub use error::{ValueError, ValueResult};
pub use metadata::Metadata;
pub use typed::{
    BoolMetadata, DoubleMetadata, FloatMetadata, Int32Metadata, Int64Metadata, MetaValue,
    StringMetadata, TypedMetadata, Vec3DMetadata, Vec3IMetadata, Vec3SMetadata,
};
pub use unknown::UnknownMetadata;
