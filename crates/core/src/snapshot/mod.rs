pub mod snapshot_counter;
pub mod snapshot_writer;
