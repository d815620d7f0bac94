//! aio-action-core: Platform-agnostic logic for the App Builder GitHub action
//!
//! This crate dispatches the action's command and implements IMS credential
//! issuance (input validation, scope resolution, token acquisition, error
//! translation and publication). It depends only on abstract platform traits
//! (Inputs, TokenService, EnvironmentSink, CommandRunner, Clock) and never
//! touches the process environment, network or child processes itself.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod ims;
pub mod platform;
pub mod publish;

#[cfg(test)]
pub mod test_support;
