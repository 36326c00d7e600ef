//! Integration tests driving the full `EnginePlugin` through `TestSession`.

mod strategy_flow_tests;
