//! Router-level tests for the ShareIt server and gateway

mod api_tests;
mod gateway_tests;
mod helper;
