//! 类型模块：定义档案查询的核心数据类型。
//!
//! # Types Module
//!
//! Core value types shared by the resolver, the transports and the sinks.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ResolvedProfile`] | Identifier plus canonical name as returned by the remote service |
//! | [`LookupOutcome`] | Terminal per-name result of a resolve operation |

pub mod outcome;
pub mod profile;

pub use outcome::LookupOutcome;
pub use profile::ResolvedProfile;
