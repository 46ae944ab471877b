use std::io::Write;

use tozemoon::config::{ConfigError, load_site_config};

#[test]
fn loads_toml_site_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("site.toml");
    let mut file = std::fs::File::create(&path).expect("create");
    writeln!(
        file,
        "[scene.durations]\ntransfer = 9.0\n\n[contact.mail]\nto = \"ops@example.com\"\n\n[server]\nbind = \"127.0.0.1:9000\""
    )
    .unwrap();

    let site = load_site_config(&path).expect("load");
    assert_eq!(site.scene.durations.transfer, 9.0);
    assert_eq!(site.scene.durations.idle, 1.2);
    assert_eq!(site.contact.mail.to, "ops@example.com");
    assert_eq!(site.server.bind, "127.0.0.1:9000");
    assert_eq!(site.contact.fallback_remote_ip, "0.0.0.0");
}

#[test]
fn loads_yaml_site_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("site.yaml");
    std::fs::write(&path, "scene:\n  moon:\n    orbit_rate_rad_s: 0.6\n").expect("write");
    let site = load_site_config(&path).expect("load");
    assert_eq!(site.scene.moon.orbit_rate_rad_s, 0.6);
}

#[test]
fn rejects_invalid_scene() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[scene.earth]\nradius = -1.0\n").expect("write");
    let loaded = load_site_config(&path);
    assert!(matches!(loaded, Err(ConfigError::InvalidScene(_))));
}

#[test]
fn bundled_site_config_loads() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("configs/site.toml");
    let site = load_site_config(path).expect("bundled config");
    assert!(site.scene.validate().is_ok());
}
