//! Idempotent publishing of course commerce state.
//!
//! A course and its seats are serialized into a [`PublishRequest`] and sent
//! to the commerce API with a single `PUT {base}/courses/{id}/`. Repeating the
//! call with the same state converges on the same remote resource.
//!
//! [`CommercePublisher::publish`] never fails: every problem is logged and
//! reported as `false`. Use [`CommercePublisher::try_publish`] when the
//! failure kind matters.
//!
//! # Modules
//!
//! - `course` - Read-only course and seat views
//! - `serializer` - Course view to request payload
//! - `publisher` - HTTP upsert
//! - `config` - Environment configuration
//! - `errors` - Error types

pub mod config;
pub mod course;
pub mod errors;
pub mod publisher;
pub mod serializer;

pub use config::{PublisherConfig, PublisherConfigError};
pub use course::{mode_for_seat, CourseView, SeatView};
pub use errors::PublishError;
pub use publisher::{CommercePublisher, PublishedStatus};
pub use serializer::{serialize_course, ModeDescriptor, PublishRequest};
