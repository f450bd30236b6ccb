//! Errors for VLAN range construction

/// Malformed or out-of-domain VLAN value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeValueError {
    /// VLAN outside `2..=4094` and not the untagged sentinel `0`
    #[error("VLAN must be between 2 and 4094, got {vlan} (0 is reserved for untagged)")]
    OutOfRange {
        /// Offending value
        vlan: u32,
    },

    /// Token is not an integer or an `start-end` pair
    #[error("malformed VLAN token `{token}`")]
    Malformed {
        /// Token as written
        token: String,
    },

    /// Range whose start lies after its end
    #[error("inverted VLAN range {start}-{end}")]
    Inverted {
        /// First value of the range
        start: u32,
        /// Last value of the range
        end: u32,
    },
}
