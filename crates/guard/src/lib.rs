//! `millgate-guard` — screen guards and conditional action rendering.
//!
//! Everything here consumes the access check API and produces *decisions
//! as data*: which screen state to show, whether a button is visible,
//! whether an activation goes through. The actual rendering belongs to
//! the UI layer.

pub mod gate;
pub mod guard;
pub mod strategy;

pub use gate::{ActionGate, Activation, DenialNotice, GateMode, Visibility};
pub use guard::{AuthSnapshot, GuardOutcome, RouteGuard, DEFAULT_LOGIN_PATH};
pub use strategy::{AllowRender, DenyRender, ViewStrategy};
