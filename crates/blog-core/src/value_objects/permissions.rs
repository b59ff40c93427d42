//! Per-user capability flags
//!
//! Stored as a single SMALLINT column so that a ban can clear every flag in
//! the same row write that changes the account status.

use bitflags::bitflags;

bitflags! {
    /// Capabilities a moderator can grant or revoke on an account
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct UserPermissions: i16 {
        /// Publish new articles
        const PUBLISH = 1 << 0;
        /// Post comments and replies
        const COMMENT = 1 << 1;

        /// Granted to every new or unbanned account
        const DEFAULT = Self::PUBLISH.bits() | Self::COMMENT.bits();
    }
}

impl UserPermissions {
    #[inline]
    pub fn can_publish(self) -> bool {
        self.contains(Self::PUBLISH)
    }

    #[inline]
    pub fn can_comment(self) -> bool {
        self.contains(Self::COMMENT)
    }

    /// Build from the raw column value, ignoring unknown bits
    #[inline]
    pub fn from_column(bits: i16) -> Self {
        Self::from_bits_truncate(bits)
    }
}

impl Default for UserPermissions {
    fn default() -> Self {
        Self::DEFAULT
    }
}
