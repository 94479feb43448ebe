//! Shared Module
//!
//! This module contains the types and pure logic that do not depend on the
//! server stack: the comment, article and user records, the thread engine
//! that normalizes and assembles comment trees, the domain error type and
//! application configuration.
//!
//! # Overview
//!
//! Everything here is synchronous and store-agnostic. The backend fetches
//! records, hands them to [`thread`] and serializes the result.

/// Comment records and client views
pub mod comment;

/// Article records
pub mod article;

/// User records and public profiles
pub mod user;

/// Reply normalization and tree assembly
pub mod thread;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use article::{Article, ArticleDetail, ArticleSummary};
pub use comment::{AdminCommentRow, Comment, CommentView, ReplyNode, ThreadNode};
pub use config::{AppConfig, AppConfigBuilder, ConfigError, Environment};
pub use error::SharedError;
pub use thread::{assemble_article, assemble_thread, normalize, ParentLink, RootOrder};
pub use user::{AuthorProfile, User};
