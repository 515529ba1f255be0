use serde::{Deserialize, Serialize};

/// Names the manager gives to nodes it creates on its own
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Display name of the root folder
    #[serde(default = "default_root_name")]
    pub root_name: String,
    /// Name given to folders made with `create_folder`
    #[serde(default = "default_folder_name")]
    pub default_folder_name: String,
    /// Name given to files made with `create_file`
    #[serde(default = "default_file_name")]
    pub default_file_name: String,
}

fn default_root_name() -> String {
    "root".to_string()
}

fn default_folder_name() -> String {
    "New folder".to_string()
}

fn default_file_name() -> String {
    "New file".to_string()
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            root_name: default_root_name(),
            default_folder_name: default_folder_name(),
            default_file_name: default_file_name(),
        }
    }
}
