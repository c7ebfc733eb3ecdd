//! # ppg-vitals
//!
//! Vital-sign estimation from fingertip photoplethysmography (PPG).
//!
//! A finger pressed against a camera lens with the flash on modulates the
//! red/blue channel averages of every frame with the blood-volume pulse.
//! This crate turns that stream of per-frame averages into heart rate,
//! blood-oxygen saturation and blood pressure:
//! - **Baseline tracking**: rolling red-channel reference level
//! - **Beat detection**: edge-triggered trough counting against the baseline
//! - **Windowed BPM**: per-window estimates with plausibility filtering and
//!   smoothing over recent windows
//! - **Derived metrics**: SpO2 from red/blue channel variation, blood
//!   pressure from heart rate plus an anthropometric profile
//!
//! ## Example
//!
//! ```ignore
//! use ppg_vitals::{VitalsPipeline, VitalsConfig, Yuv420spDecoder};
//!
//! let pipeline = VitalsPipeline::new(
//!     VitalsConfig::default(),
//!     Default::default(),
//!     Box::new(Yuv420spDecoder),
//!     Box::new(sink),
//! );
//!
//! pipeline.start();
//! for frame in camera_frames {
//!     pipeline.on_frame(&frame.data, frame.width, frame.height, frame.timestamp_us);
//! }
//! pipeline.stop();
//! ```

pub mod config;
pub mod decode;
pub mod measurement;
pub mod pipeline;
pub mod ppg;
pub mod vitals;

pub use config::{AnthropometricProfile, ConfigError, Gender, Posture, VitalsConfig};
pub use decode::{ChannelAverages, ColorDecoder, Yuv420spDecoder};
pub use measurement::{BloodPressure, Measurement, MeasurementSink, NullSink, Progress};
pub use pipeline::{FrameOutcome, VitalsPipeline};
pub use vitals::EstimateError;
