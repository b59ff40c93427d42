//! Data transfer objects for requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for inputs
//! - Response DTOs for serializing outputs
//! - Mappers for converting domain values to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use mappers::CommentWithAuthor;

pub use requests::{
    CreateCommentRequest, EditArticleRequest, EditCommentRequest, PublishArticleRequest,
    RegisterUserRequest,
};

pub use responses::{
    ArticleResponse, AuditSummaryResponse, CommentResponse, CommenterResponse, DriftResponse,
    FollowCounts, FollowStatusResponse, RelationshipResponse, UserResponse,
};
