pub mod cycle_logger;
pub mod domain;
pub mod recognition_loop;
pub mod stop_signal;
