//! CPU configuration.

/// What the CPU does when it fetches a reserved opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UndefinedOpcodePolicy {
    /// Consume the opcode and the operand bytes the hardware would skip, then continue.
    #[default]
    Nop,
    /// Stop the step and return `ExecutionError::UndefinedOpcode`.
    Trap,
}

/// Construction-time options for a `CPU`.
///
/// # Examples
///
/// ```
/// use lib65c02::{CpuConfig, UndefinedOpcodePolicy};
///
/// let config = CpuConfig::default().undefined_opcodes(UndefinedOpcodePolicy::Trap);
/// assert_eq!(config.undefined_opcodes, UndefinedOpcodePolicy::Trap);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpuConfig {
    /// Handling of reserved opcodes
    pub undefined_opcodes: UndefinedOpcodePolicy,
}

impl CpuConfig {
    /// Returns a config with the given reserved-opcode policy.
    pub fn undefined_opcodes(mut self, policy: UndefinedOpcodePolicy) -> Self {
        self.undefined_opcodes = policy;
        self
    }
}
