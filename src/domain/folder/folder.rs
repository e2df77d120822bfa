use serde::Serialize;
use std::fmt;

/// Identifies one synchronizable mailbox folder: the owning context,
/// user and account plus the folder full name. Cache rows and refresh
/// markers are keyed by this tuple.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct FolderKey {
    pub context_id: u32,
    pub user_id: u32,
    pub account_id: u32,
    pub folder: String,
}

impl FolderKey {
    pub fn new<F>(context_id: u32, user_id: u32, account_id: u32, folder: F) -> Self
    where
        F: ToString,
    {
        Self {
            context_id,
            user_id,
            account_id,
            folder: folder.to_string(),
        }
    }
}

impl fmt::Display for FolderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.context_id, self.user_id, self.account_id, self.folder,
        )
    }
}

#[cfg(test)]
mod folder {
    use super::FolderKey;

    #[test]
    fn display_joins_the_coordinate() {
        let folder = FolderKey::new(1, 2, 0, "INBOX/Work");
        assert_eq!("1/2/0/INBOX/Work", folder.to_string());
    }
}
