//! # track-service
//!
//! Application layer containing business logic, services, and DTOs.
//!
//! ## Overview
//!
//! Services are lightweight views over a shared [`ServiceContext`]: they
//! borrow the context, talk to the repositories through their traits, and
//! map entities into response DTOs. Nothing here knows about HTTP.
//!
//! ## Services
//!
//! - [`TrackService`]: registration, listing, updates, deletion
//! - [`OpenService`]: pixel-fetch classification and storage
//! - [`StatsService`]: global counters, histograms, recipient engagement
//! - [`NotifyService`]: first-open and follow-up notification scans

pub mod dto;
pub mod services;

pub use dto::{
    CreateTrackRequest, HealthResponse, ListTracksQuery, OpenEventResponse,
    RecipientEngagementResponse, StatsResponse, TrackResponse, TrackSummaryResponse,
    UpdateTrackRequest,
};
pub use services::{
    NotifyService, OpenService, ScanOutcome, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult, StatsService, TrackService,
};
