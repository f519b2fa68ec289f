use crate::dragdrop::ShortcutResolver;
use std::path::{Path, PathBuf};

/// Platform shortcut resolution. On Windows this parses .lnk files through
/// the shell-link API; elsewhere there is no indirection to resolve.
pub struct ShellShortcutResolver;

impl ShortcutResolver for ShellShortcutResolver {
    fn resolve(&self, path: &Path) -> Option<PathBuf> {
        resolve_shortcut_target(path)
    }
}

/// Directory revealed by the "open location" intent.
pub fn containing_dir(target: &str) -> Option<PathBuf> {
    let path = Path::new(target);
    if path.is_dir() {
        return Some(path.to_path_buf());
    }
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf())
}

pub fn open_location(target: &str) -> bool {
    match containing_dir(target) {
        Some(dir) => launch(&dir.to_string_lossy(), None),
        None => false,
    }
}

#[cfg(target_os = "windows")]
mod platform {
    use std::os::windows::ffi::OsStrExt;
    use std::path::{Path, PathBuf};
    use windows::core::{Interface, PCWSTR};
    use windows::Win32::Foundation::HWND;
    use windows::Win32::Storage::FileSystem::WIN32_FIND_DATAW;
    use windows::Win32::System::Com::{
        CoCreateInstance, CoInitializeEx, CoUninitialize, IPersistFile, CLSCTX_INPROC_SERVER,
        COINIT_APARTMENTTHREADED, STGM_READ,
    };
    use windows::Win32::UI::Shell::{
        IShellLinkW, ShellExecuteW, ShellLink, SLGP_RAWPATH, SLR_ANY_MATCH, SLR_NO_UI,
    };
    use windows::Win32::UI::WindowsAndMessaging::SHOW_WINDOW_CMD;

    fn to_wide(value: &std::ffi::OsStr) -> Vec<u16> {
        value.encode_wide().chain(std::iter::once(0)).collect()
    }

    fn utf16z_to_string(wide: &[u16]) -> String {
        let end = wide.iter().position(|c| *c == 0).unwrap_or(wide.len());
        String::from_utf16_lossy(&wide[..end])
    }

    fn shell_execute(verb: &str, target: &str, args: Option<&str>) -> bool {
        unsafe {
            let verb_wide: Vec<u16> = verb.encode_utf16().chain(std::iter::once(0)).collect();
            let target_wide = to_wide(std::ffi::OsStr::new(target));
            let args_wide: Option<Vec<u16>> = args
                .filter(|a| !a.trim().is_empty())
                .map(|a| a.encode_utf16().chain(std::iter::once(0)).collect());
            let result = ShellExecuteW(
                HWND(std::ptr::null_mut()),
                PCWSTR(verb_wide.as_ptr()),
                PCWSTR(target_wide.as_ptr()),
                args_wide
                    .as_ref()
                    .map(|w| PCWSTR(w.as_ptr()))
                    .unwrap_or(PCWSTR::null()),
                PCWSTR::null(),
                SHOW_WINDOW_CMD(1),
            );
            result.0 as isize > 32
        }
    }

    pub fn launch(target: &str, args: Option<&str>) -> bool {
        shell_execute("open", target, args)
    }

    pub fn launch_elevated(target: &str, args: Option<&str>) -> bool {
        shell_execute("runas", target, args)
    }

    pub fn resolve_shortcut_target(path: &Path) -> Option<PathBuf> {
        let is_lnk = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|s| s.eq_ignore_ascii_case("lnk"));
        if !is_lnk {
            return None;
        }

        unsafe {
            let com_initialized = CoInitializeEx(None, COINIT_APARTMENTTHREADED).is_ok();

            let result = (|| {
                let shell_link: IShellLinkW =
                    CoCreateInstance(&ShellLink, None, CLSCTX_INPROC_SERVER).ok()?;
                let persist_file: IPersistFile = shell_link.cast().ok()?;

                let shortcut_wide = to_wide(path.as_os_str());
                persist_file
                    .Load(PCWSTR(shortcut_wide.as_ptr()), STGM_READ)
                    .ok()?;
                let _ = shell_link.Resolve(
                    HWND(std::ptr::null_mut()),
                    (SLR_NO_UI.0 | SLR_ANY_MATCH.0) as u32,
                );

                let mut target_buf = vec![0u16; 4096];
                let mut find_data = WIN32_FIND_DATAW::default();
                if shell_link
                    .GetPath(&mut target_buf, &mut find_data, SLGP_RAWPATH.0 as u32)
                    .is_err()
                {
                    shell_link.GetPath(&mut target_buf, &mut find_data, 0).ok()?;
                }
                let target = utf16z_to_string(&target_buf);
                let target = target.trim();
                if target.is_empty() {
                    return None;
                }
                Some(PathBuf::from(target))
            })();

            if com_initialized {
                CoUninitialize();
            }
            result
        }
    }
}

#[cfg(not(target_os = "windows"))]
mod platform {
    use std::path::{Path, PathBuf};
    use std::process::Command;

    #[cfg(target_os = "macos")]
    const OPENER: &str = "open";
    #[cfg(not(target_os = "macos"))]
    const OPENER: &str = "xdg-open";

    pub fn launch(target: &str, args: Option<&str>) -> bool {
        let mut command = Command::new(OPENER);
        command.arg(target);
        if let Some(args) = args {
            command.arg(args);
        }
        command.spawn().is_ok()
    }

    // No privilege-elevation verb outside Windows.
    pub fn launch_elevated(target: &str, args: Option<&str>) -> bool {
        launch(target, args)
    }

    pub fn resolve_shortcut_target(_path: &Path) -> Option<PathBuf> {
        None
    }
}

pub use platform::{launch, launch_elevated, resolve_shortcut_target};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containing_dir_strips_the_file_name() {
        let dir = containing_dir("/opt/apps/tool");
        assert_eq!(dir, Some(PathBuf::from("/opt/apps")));
    }

    #[test]
    fn containing_dir_rejects_bare_names() {
        assert_eq!(containing_dir("tool.exe"), None);
        assert_eq!(containing_dir(""), None);
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn non_windows_resolver_is_a_no_op() {
        let resolver = ShellShortcutResolver;
        assert_eq!(resolver.resolve(Path::new("app.lnk")), None);
    }
}
