bitflags::bitflags! {
    pub struct CommandFlags: u8 {
        const STAFF      = 1 << 0;
        const SKIP_DEFER = 1 << 1;
    }
}

impl CommandFlags {
    /// Whether to show a typing indicator while the command runs.
    pub fn defer(self) -> bool {
        !self.contains(CommandFlags::SKIP_DEFER)
    }

    /// Requires one of the configured staff roles.
    pub fn staff(self) -> bool {
        self.contains(CommandFlags::STAFF)
    }
}
