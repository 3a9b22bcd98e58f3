pub mod ducking;
