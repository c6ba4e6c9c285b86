//! # Manip: Configurable Manipulation Tasks
//!
//! Documentation entry point and rollout harness for the task evaluation
//! engine.
//!
//! ## Overview
//!
//! A manipulation task is described entirely by data: where the object and
//! goal may be placed, how close counts as success, and how the dense reward
//! is assembled from shaped distances. The same engine therefore serves
//! every task variant; only the [`tasks::TaskConfig`] changes.
//!
//! ### The Crates
//!
//! -   **[`shaping`]:** Scalar reward primitives. The `tolerance` function
//!     maps a distance to `[0, 1]` through one of eight sigmoid families, and
//!     the Hamacher product fuses two scores as a soft AND.
//! -   **[`scene`]:** Geometry types, the 39-element observation layout, the
//!     `Scene` trait the tasks read from and write to, and a kinematic
//!     reference scene that needs no physics engine.
//! -   **[`tasks`]:** Task configuration, constrained goal sampling, the
//!     gripper caging reward and the evaluator that turns observations into
//!     rewards and diagnostics.
//! -   **`manip`:** This crate. A scripted waypoint controller
//!     ([`policy::ScriptedPolicy`]) and a rollout loop ([`app::run_episodes`])
//!     used by the `manip` binary to sanity check task configurations.
//!
//! ## Getting Started
//!
//! ```text
//! manip --task basketball --episodes 20 --seed 3
//! manip --config my_task.json --json > steps.jsonl
//! ```

pub mod app;
pub mod policy;

pub use scene;
pub use shaping;
pub use tasks;
