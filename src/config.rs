use crate::button::LaunchItem;
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupConfig {
    pub name: String,
    #[serde(default)]
    pub items: Vec<LaunchItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PanelConfig {
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
    #[serde(default)]
    pub selected_group: Option<String>,
    #[serde(default)]
    pub grid_mode: bool,
    pub last_pos: Option<(f32, f32)>,
    #[serde(default)]
    pub last_size: Option<(f32, f32)>,
    #[serde(default = "default_icon_size")]
    pub icon_size: u32,
}

fn default_icon_size() -> u32 {
    32
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            groups: vec![GroupConfig {
                name: "Apps".to_string(),
                items: Vec::new(),
            }],
            selected_group: None,
            grid_mode: false,
            last_pos: None,
            last_size: None,
            icon_size: default_icon_size(),
        }
    }
}

impl PanelConfig {
    pub fn load() -> Self {
        if let Some(proj_dirs) = directories::ProjectDirs::from("com", "quickdeck", "quickdeck") {
            let config_path = proj_dirs.config_dir().join("config.json");
            if config_path.exists() {
                if let Ok(file) = std::fs::File::open(config_path) {
                    match serde_json::from_reader::<_, PanelConfig>(file) {
                        Ok(mut config) => {
                            if config.groups.is_empty() {
                                config.groups = PanelConfig::default().groups;
                            }
                            return config;
                        }
                        Err(err) => warn!("failed to parse config, using default: {err}"),
                    }
                }
            }
        }
        Self::default()
    }

    pub fn save(&self) {
        if let Some(proj_dirs) = directories::ProjectDirs::from("com", "quickdeck", "quickdeck") {
            let config_dir = proj_dirs.config_dir();
            if std::fs::create_dir_all(config_dir).is_ok() {
                let config_path = config_dir.join("config.json");
                if let Ok(file) = std::fs::File::create(config_path) {
                    let _ = serde_json::to_writer_pretty(file, self);
                }
            }
        }
    }

    pub fn config_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "quickdeck", "quickdeck")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Replaces one group's item list, appending the group if it is new.
    pub fn set_group_items(&mut self, name: &str, items: Vec<LaunchItem>) {
        if let Some(group) = self.groups.iter_mut().find(|g| g.name == name) {
            group.items = items;
        } else {
            self.groups.push(GroupConfig {
                name: name.to_string(),
                items,
            });
        }
    }

    pub fn remove_group(&mut self, name: &str) {
        self.groups.retain(|g| g.name != name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str) -> LaunchItem {
        LaunchItem::from_target(name.to_string(), format!(r"C:\Apps\{name}.exe"))
    }

    #[test]
    fn default_config_always_has_one_group() {
        let config = PanelConfig::default();
        assert_eq!(config.groups.len(), 1);
        assert_eq!(config.groups[0].name, "Apps");
    }

    #[test]
    fn set_group_items_replaces_or_appends() {
        let mut config = PanelConfig::default();
        config.set_group_items("Apps", vec![item("a")]);
        assert_eq!(config.groups[0].items.len(), 1);

        config.set_group_items("Games", vec![item("b"), item("c")]);
        assert_eq!(config.groups.len(), 2);
        assert_eq!(config.groups[1].items.len(), 2);

        config.set_group_items("Apps", vec![]);
        assert!(config.groups[0].items.is_empty());
    }

    #[test]
    fn config_round_trips_through_json() {
        let mut config = PanelConfig::default();
        let mut sep = LaunchItem::separator();
        sep.id = 1;
        config.set_group_items("Apps", vec![item("a"), sep]);
        config.grid_mode = true;
        config.last_size = Some((320.0, 640.0));

        let text = serde_json::to_string(&config).expect("serialize");
        let parsed: PanelConfig = serde_json::from_str(&text).expect("parse");
        assert_eq!(parsed.groups, config.groups);
        assert!(parsed.grid_mode);
        assert_eq!(parsed.last_size, Some((320.0, 640.0)));
    }
}
