//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements     | Connects to                     |
//! |------------|----------------|---------------------------------|
//! | `alerts`   | AlertSink      | `log` warnings / errors         |
//! | `devices`  | DeviceActuator | In-memory device state table    |
//! | `log_sink` | EventSink      | `log` info / warn lines         |
//! | `source`   | SensorSource   | Scripted payload queue          |

pub mod alerts;
pub mod devices;
pub mod log_sink;
pub mod source;
