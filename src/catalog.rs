//! Static language/framework catalog
//!
//! One immutable table maps each supported language to its test frameworks
//! and its project-init command template. Init commands may reference the
//! project name as `${name}`; framework commands carry a single `^` marker
//! where the test-name filter is substituted at stage-execution time.
//! Adding a language or framework is a data change here, nothing else.

use crate::types::{CatalogError, Result};

/// A supported programming language and its scaffolding recipe
#[derive(Debug, Clone, Copy)]
pub struct LanguageProfile {
    pub name: &'static str,
    pub init_command: &'static str,
    pub frameworks: &'static [FrameworkProfile],
}

/// A test framework and its invocation template
#[derive(Debug, Clone, Copy)]
pub struct FrameworkProfile {
    pub name: &'static str,
    pub command: &'static str,
}

impl LanguageProfile {
    /// Look up a framework by name (ASCII case-insensitive)
    pub fn framework(&self, name: &str) -> Result<&'static FrameworkProfile> {
        self.frameworks
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                CatalogError::UnknownFramework {
                    language: self.name.to_string(),
                    framework: name.to_string(),
                }
                .into()
            })
    }

    /// First framework in presentation order
    pub fn default_framework(&self) -> &'static FrameworkProfile {
        &self.frameworks[0]
    }
}

/// All supported languages, in presentation order
pub fn languages() -> &'static [LanguageProfile] {
    LANGUAGES
}

/// Look up a language by name (ASCII case-insensitive)
pub fn lookup(name: &str) -> Result<&'static LanguageProfile> {
    LANGUAGES
        .iter()
        .find(|l| l.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| {
            CatalogError::UnknownLanguage {
                name: name.to_string(),
            }
            .into()
        })
}

static LANGUAGES: &[LanguageProfile] = &[
    LanguageProfile {
        name: "JavaScript",
        init_command: "mkdir ${name} && cd ${name} && npm init -y",
        frameworks: &[
            FrameworkProfile {
                name: "Jest",
                command: "jest ^",
            },
            FrameworkProfile {
                name: "Mocha",
                command: "mocha --grep \"^\"",
            },
            FrameworkProfile {
                name: "Vitest",
                command: "vitest --testNamePattern=\"^\"",
            },
            FrameworkProfile {
                name: "AVA",
                command: "ava -m \"^\"",
            },
        ],
    },
    LanguageProfile {
        name: "TypeScript",
        init_command: "mkdir ${name} && cd ${name} && npm init -y",
        frameworks: &[
            FrameworkProfile {
                name: "Jest",
                command: "jest ^",
            },
            FrameworkProfile {
                name: "Vitest",
                command: "vitest --testNamePattern=\"^\"",
            },
            FrameworkProfile {
                name: "Mocha",
                command: "mocha --grep \"^\"",
            },
            FrameworkProfile {
                name: "uvu",
                command: "uvu . \"^\"",
            },
        ],
    },
    LanguageProfile {
        name: "Python",
        init_command: "mkdir ${name} && cd ${name} && python -m venv env",
        frameworks: &[
            FrameworkProfile {
                name: "pytest",
                command: "pytest -k \"^\"",
            },
            FrameworkProfile {
                name: "unittest",
                command: "python -m unittest discover -p \"^*.py\"",
            },
            FrameworkProfile {
                name: "nose2",
                command: "nose2 -m \"^\"",
            },
            FrameworkProfile {
                name: "doctest",
                command: "python -m doctest ^.py",
            },
        ],
    },
    LanguageProfile {
        name: "Java",
        init_command: "mkdir ${name} && cd ${name} && mvn archetype:generate",
        frameworks: &[
            FrameworkProfile {
                name: "JUnit",
                command: "mvn test -Dtest=\"^*\"",
            },
            FrameworkProfile {
                name: "TestNG",
                command: "mvn test -Dtest=\"^*\"",
            },
            FrameworkProfile {
                name: "Spock",
                command: "gradle test --tests \"^*\"",
            },
        ],
    },
    LanguageProfile {
        name: "C#",
        init_command: "dotnet new console -o ${name}",
        frameworks: &[
            FrameworkProfile {
                name: "xUnit",
                command: "dotnet test --filter \"FullyQualifiedName~^\"",
            },
            FrameworkProfile {
                name: "NUnit",
                command: "dotnet test --filter \"FullyQualifiedName~^\"",
            },
            FrameworkProfile {
                name: "MSTest",
                command: "dotnet test --filter \"TestCategory=^\"",
            },
        ],
    },
    LanguageProfile {
        name: "C++",
        init_command: "mkdir ${name} && cd ${name} && cmake . && make",
        frameworks: &[
            FrameworkProfile {
                name: "Google Test",
                command: "./test_binary --gtest_filter=\"^*\"",
            },
            FrameworkProfile {
                name: "Boost.Test",
                command: "./test_binary --run_test=^*",
            },
            FrameworkProfile {
                name: "Catch2",
                command: "./test_binary \"[^*]\"",
            },
        ],
    },
    LanguageProfile {
        name: "Go",
        init_command: "go mod init ${name}",
        frameworks: &[
            FrameworkProfile {
                name: "testing (built-in)",
                command: "go test -run \"^\"",
            },
            FrameworkProfile {
                name: "Ginkgo",
                command: "ginkgo -focus=\"^\"",
            },
            FrameworkProfile {
                name: "Testify",
                command: "go test -run \"^\"",
            },
        ],
    },
    LanguageProfile {
        name: "Rust",
        init_command: "cargo new ${name}",
        frameworks: &[
            FrameworkProfile {
                name: "cargo test (built-in)",
                command: "cargo test ^",
            },
            FrameworkProfile {
                name: "specs",
                command: "cargo test ^",
            },
            FrameworkProfile {
                name: "proptest",
                command: "cargo test ^",
            },
        ],
    },
    LanguageProfile {
        name: "Ruby",
        init_command: "mkdir ${name} && cd ${name} && bundle init",
        frameworks: &[
            FrameworkProfile {
                name: "RSpec",
                command: "rspec --example \"^\"",
            },
            FrameworkProfile {
                name: "Minitest",
                command: "ruby -Ilib:test test/^_test.rb",
            },
            FrameworkProfile {
                name: "Cucumber",
                command: "cucumber --name \"^\"",
            },
        ],
    },
    LanguageProfile {
        name: "PHP",
        init_command: "composer init --name=\"${name}\"",
        frameworks: &[
            FrameworkProfile {
                name: "PHPUnit",
                command: "phpunit --filter \"^\"",
            },
            FrameworkProfile {
                name: "Codeception",
                command: "codecept run --grep \"^\"",
            },
            FrameworkProfile {
                name: "Behat",
                command: "behat --name \"^\"",
            },
        ],
    },
    LanguageProfile {
        name: "Kotlin",
        init_command: "mkdir ${name} && cd ${name} && gradle init",
        frameworks: &[
            FrameworkProfile {
                name: "Kotest",
                command: "./gradlew test --tests \"^*\"",
            },
            FrameworkProfile {
                name: "JUnit",
                command: "./gradlew test --tests \"^*\"",
            },
            FrameworkProfile {
                name: "Spek",
                command: "./gradlew test --tests \"^*\"",
            },
        ],
    },
    LanguageProfile {
        name: "Swift",
        init_command: "mkdir ${name} && cd ${name} && swift package init --type executable",
        frameworks: &[
            FrameworkProfile {
                name: "XCTest",
                command: "xcodebuild test -only-testing:^",
            },
            FrameworkProfile {
                name: "Quick",
                command: "xcodebuild test -only-testing:^",
            },
            FrameworkProfile {
                name: "Nimble",
                command: "xcodebuild test -only-testing:^",
            },
        ],
    },
    LanguageProfile {
        name: "Scala",
        init_command: "mkdir ${name} && cd ${name} && sbt new scala/scala-seed.g8",
        frameworks: &[
            FrameworkProfile {
                name: "ScalaTest",
                command: "sbt \"testOnly * -- -z ^\"",
            },
            FrameworkProfile {
                name: "Specs2",
                command: "sbt \"testOnly * -- -include ^\"",
            },
            FrameworkProfile {
                name: "MUnit",
                command: "sbt \"testOnly * -- -z ^\"",
            },
        ],
    },
    LanguageProfile {
        name: "Dart",
        init_command: "dart create ${name}",
        frameworks: &[
            FrameworkProfile {
                name: "test (built-in)",
                command: "dart test --name \"^\"",
            },
            FrameworkProfile {
                name: "flutter_test",
                command: "flutter test --name \"^\"",
            },
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::templates::{self, MARKER};
    use std::collections::HashMap;

    #[test]
    fn test_language_names_unique_and_non_empty() {
        let mut seen = std::collections::HashSet::new();
        for language in languages() {
            assert!(!language.name.is_empty());
            assert!(
                seen.insert(language.name),
                "duplicate language name: {}",
                language.name
            );
        }
    }

    #[test]
    fn test_every_language_has_frameworks() {
        for language in languages() {
            assert!(
                !language.frameworks.is_empty(),
                "{} has no frameworks",
                language.name
            );
        }
    }

    #[test]
    fn test_every_framework_command_carries_marker() {
        for language in languages() {
            for framework in language.frameworks {
                assert!(
                    framework.command.contains(MARKER),
                    "{}/{} command lacks the marker: {}",
                    language.name,
                    framework.name,
                    framework.command
                );
            }
        }
    }

    #[test]
    fn test_resolution_totality_over_catalog() {
        // Every framework template resolves for any well-formed filter value,
        // and every init template resolves with just the name binding.
        let bindings = HashMap::from([("name".to_string(), "sample".to_string())]);
        for language in languages() {
            templates::resolve(language.init_command, &bindings)
                .unwrap_or_else(|e| panic!("{} init failed to resolve: {}", language.name, e));
            for framework in language.frameworks {
                templates::resolve_marker(framework.command, "stage_sample_").unwrap_or_else(|e| {
                    panic!("{}/{} failed to resolve: {}", language.name, framework.name, e)
                });
                // Empty filter means "all tests" and is legal too
                templates::resolve_marker(framework.command, "").unwrap();
            }
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(lookup("go").unwrap().name, "Go");
        assert_eq!(lookup("JAVASCRIPT").unwrap().name, "JavaScript");
    }

    #[test]
    fn test_lookup_unknown_language() {
        match lookup("Cobol") {
            Err(crate::types::Error::Catalog(CatalogError::UnknownLanguage { name })) => {
                assert_eq!(name, "Cobol");
            }
            other => panic!("Expected UnknownLanguage, got: {:?}", other.map(|l| l.name)),
        }
    }

    #[test]
    fn test_framework_lookup() {
        let go = lookup("Go").unwrap();
        assert_eq!(go.framework("Testify").unwrap().command, "go test -run \"^\"");
        assert_eq!(go.default_framework().name, "testing (built-in)");

        match go.framework("JUnit") {
            Err(crate::types::Error::Catalog(CatalogError::UnknownFramework {
                language,
                framework,
            })) => {
                assert_eq!(language, "Go");
                assert_eq!(framework, "JUnit");
            }
            other => panic!("Expected UnknownFramework, got: {:?}", other.map(|f| f.name)),
        }
    }
}
