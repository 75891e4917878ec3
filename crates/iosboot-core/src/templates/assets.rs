//! Template assets compiled into the binary from `templates/ios`

macro_rules! asset {
    ($name:literal) => {
        ($name, include_str!(concat!("../../templates/ios/", $name)))
    };
}

/// (template name, contents) for every built-in template
pub const EMBEDDED: &[(&str, &str)] = &[
    asset!("project.yml"),
    asset!("README.md"),
    asset!("swiftlint.yml"),
    asset!("swift-format.json"),
    asset!("gitignore"),
    asset!("ci.yml"),
    asset!("pre-commit"),
    asset!("starter/App.swift"),
    asset!("starter/ContentView.swift"),
    asset!("starter/ContentViewModel.swift"),
    asset!("starter/UnitTests-xctest.swift"),
    asset!("starter/UnitTests-swift-testing.swift"),
    asset!("starter/UITests.swift"),
    asset!("starter/Info.plist"),
];

/// Look up a built-in template by name
pub fn embedded(name: &str) -> Option<&'static str> {
    EMBEDDED
        .iter()
        .find(|(asset, _)| *asset == name)
        .map(|(_, content)| *content)
}
