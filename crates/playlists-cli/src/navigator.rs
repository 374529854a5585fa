use playlists_core::navigation::{Navigator, LOGIN_PATH, ROOT_PATH};

/// A terminal has no pages; a redirect becomes a hint on stderr.
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn redirect(&self, path: &str) {
        eprintln!("{}", hint(path));
    }
}

fn hint(path: &str) -> String {
    match path {
        LOGIN_PATH => "Not logged in. Run `playlists login --email <EMAIL>` to sign in.".to_string(),
        ROOT_PATH => "Already logged in. Use `playlists logout` first, or pass --force.".to_string(),
        other => format!("Continue at {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_for_known_paths() {
        assert!(hint(LOGIN_PATH).contains("playlists login"));
        assert!(hint(ROOT_PATH).contains("Already logged in"));
        assert_eq!(hint("/bands"), "Continue at /bands");
    }
}
