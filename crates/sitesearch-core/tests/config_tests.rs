use figment::Jail;
use std::path::Path;

use sitesearch_core::config::{expand_path, Config, Settings};

fn load() -> figment::error::Result<Settings> {
    let config = Config::load().map_err(|e| e.to_string())?;
    Ok(config.settings().map_err(|e| e.to_string())?)
}

#[test]
fn env_vars_override_nested_keys() {
    Jail::expect_with(|jail| {
        jail.set_env("RUST_ENV", "dev");
        jail.set_env("SITESEARCH_INDEX__MAX_VOCAB", 2000);
        jail.set_env("SITESEARCH_QUERY__CLI_K", 7);

        let settings = load()?;
        assert_eq!(settings.index.max_vocab, 2000);
        assert_eq!(settings.query.cli_k, 7);
        assert_eq!(settings.index.max_chars, 900);
        Ok(())
    });
}

#[test]
fn invalid_env_override_fails_load() {
    Jail::expect_with(|jail| {
        jail.set_env("RUST_ENV", "dev");
        jail.set_env("SITESEARCH_INDEX__MIN_CHARS", 5000);
        assert!(Config::load().is_err());
        Ok(())
    });
}

#[test]
fn environment_file_layers_over_base_file() {
    Jail::expect_with(|jail| {
        jail.create_file("sitesearch.toml", "[index]\nmax_vocab = 100\nmin_chars = 300\n")?;
        jail.create_file("sitesearch.prod.toml", "[index]\nmax_vocab = 200\n")?;

        jail.set_env("RUST_ENV", "dev");
        let dev = load()?;
        assert_eq!(dev.index.max_vocab, 100);

        jail.set_env("RUST_ENV", "production");
        let prod = load()?;
        assert_eq!(prod.index.max_vocab, 200);
        assert_eq!(prod.index.min_chars, 300);

        jail.set_env("SITESEARCH_INDEX__MAX_VOCAB", 300);
        assert_eq!(load()?.index.max_vocab, 300);
        Ok(())
    });
}

#[test]
fn paths_expand_env_vars_and_home() {
    Jail::expect_with(|jail| {
        let root = jail.directory().to_path_buf();
        jail.set_env("RUST_ENV", "dev");
        jail.set_env("HOME", root.display());
        jail.set_env("SITE_ROOT", root.join("site").display());
        jail.create_file(
            "sitesearch.toml",
            "[paths]\ncontent_dir = \"${SITE_ROOT}/content\"\nsnapshot_path = \"~/out/index.json\"\n",
        )?;

        let paths = load()?.resolve_paths(Path::new("/elsewhere"));
        assert_eq!(paths.content_dir, root.join("site/content"));
        assert_eq!(paths.snapshot_path, root.join("out/index.json"));
        assert_eq!(paths.settings_dir, Path::new("/elsewhere/content/settings"));
        assert_eq!(expand_path("~/x"), root.join("x"));
        Ok(())
    });
}
