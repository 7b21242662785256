//! Link-to-video retrieval pipeline.
//!
//! Scans free-form chat text for TikTok links, resolves short links to their
//! canonical form, extracts the video id, asks the tikwm lookup API for a
//! watermark-free rendition, and downloads the bytes. The orchestrator drives
//! these stages per link and reports progress to a caller-supplied sink.

pub mod download;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod orchestrate;
pub mod resolve;
pub mod scan;

pub use {
    download::{Downloader, HttpDownloader},
    error::{DownloadError, FailureKind, Result},
    extract::{VideoId, extract},
    fetch::{MediaPayload, RenditionFetcher},
    orchestrate::{LinkOutcome, Pipeline, ProgressSink},
    resolve::{CanonicalUrl, Resolver},
    scan::{Link, scan},
};
