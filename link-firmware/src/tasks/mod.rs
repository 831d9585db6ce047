// Task-Modul: Enthält alle Embassy Tasks
//
// Der Controller Task treibt das Protokoll, der LED Task zeigt den Status.
// Beide kommunizieren über den StatusChannel.

pub mod controller;
pub mod status_led;

// Re-export Tasks für einfachen Import
pub use controller::{basic_controller_task, controller_task};
pub use status_led::status_led_task;
