pub mod fifo_queue;
pub mod replacer;
