// Testing Tools Library
//
// This crate provides testing utilities for the webhook receiver.
// Currently includes:
// - webhook-test-client: sends signed, unsigned and deliberately broken
//   webhook deliveries to a running receiver and checks its answers

pub mod api_client;
pub mod output;
pub mod scenarios;
