//! Test fixtures and constants.

/// Identity for commits made by tests and by `replicate --commit`.
pub const GIT_IDENTITY: &[(&str, &str)] = &[
    ("GIT_AUTHOR_NAME", "envops-test"),
    ("GIT_AUTHOR_EMAIL", "envops-test@example.com"),
    ("GIT_COMMITTER_NAME", "envops-test"),
    ("GIT_COMMITTER_EMAIL", "envops-test@example.com"),
];

/// Flags shared by every replicate invocation (workspace and repos are added
/// by the harness).
pub const REPLICATE_FLAGS: &[(&str, &str)] = &[
    ("--username", "bot"),
    ("--token", "tok-12345"),
    ("--base-client", "acme"),
    ("--base-env", "uat"),
    ("--new-client", "globex"),
    ("--new-env", "prod"),
    ("--old-hostname", "uat.acme.example.com"),
    ("--new-hostname", "prod.globex.example.com"),
    ("--old-url", "https://acme.example.com"),
    ("--new-url", "https://globex.example.com"),
];

/// Config file in the base environment.
pub const APP_PROPERTIES: &str = "\
server.host=uat.acme.example.com
api.url=https://acme.example.com/api
cors=uat.acme.example.com
";

/// The same file after substitution.
pub const APP_PROPERTIES_PATCHED: &str = "\
server.host=prod.globex.example.com
api.url=https://globex.example.com/api
cors=prod.globex.example.com
";

/// Binary file that must survive untouched.
pub const BINARY_BLOB: &[u8] = &[0x89, b'P', b'N', b'G', 0xff, 0xfe, 0x00, 0x01];

/// Pipeline definition listing the existing clients.
pub const JENKINSFILE: &str = "\
pipeline {
  agent any
  stages {
    stage('Select') {
      steps {
        script {
          env.CLIENT=input message: 'Pick client', parameters: [choice(name: 'CLIENT', choices: ['zeta','acme'])]
        }
      }
    }
  }
}
";

/// Files of a typical service repository.
pub fn service_files() -> Vec<(&'static str, &'static [u8])> {
    vec![
        ("Jenkinsfile", JENKINSFILE.as_bytes()),
        (
            "environments/acme/uat/app.properties",
            APP_PROPERTIES.as_bytes(),
        ),
        ("environments/acme/uat/static/logo.png", BINARY_BLOB),
        ("environments/acme/dev/app.properties", b"dev=1\n"),
    ]
}
