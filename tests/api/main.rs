// fn main not required; every file here is bundled into a single test binary,
// which keeps linking time down
mod health_check;
mod newsletter;
mod postgres;
mod signup;

// "when a tokio runtime is shut down all tasks spawned on it are dropped.
// tokio::test spins up a new runtime at the beginning of each test case and
// they shut down at the end of each test case."
