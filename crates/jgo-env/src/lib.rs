//! Content-addressed environment materialization and Java launch planning:
//! cache-key fingerprinting (spec §4.5), the Environment Builder (spec
//! §4.6), and the Launch Planner (spec §4.7).

pub mod bytecode;
pub mod classify;
pub mod classpath;
pub mod fingerprint;
pub mod launch;
pub mod materialize;
