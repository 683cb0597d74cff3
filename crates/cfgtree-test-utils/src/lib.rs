//! Testing utilities for cfgtree workspace
//!
//! Shared builders and fixture payloads.

#![allow(missing_docs)]

use cfgtree_model::{ConfigFile, Directive, Payload};

pub fn leaf(name: &str, args: &[&str]) -> Directive {
    Directive::new(name, args.iter().copied())
}

pub fn block(name: &str, args: &[&str], children: Vec<Directive>) -> Directive {
    Directive::block(name, args.iter().copied(), children)
}

pub fn include(pattern: &str, units: &[usize]) -> Directive {
    Directive::include([pattern], units.to_vec())
}

pub fn comment(text: &str) -> Directive {
    Directive::comment(text)
}

pub fn file(name: &str, parsed: Vec<Directive>) -> ConfigFile {
    ConfigFile::new(name, parsed)
}

pub fn payload(files: Vec<ConfigFile>) -> Payload {
    Payload::new(files)
}

pub fn single(parsed: Vec<Directive>) -> Payload {
    Payload::single("nginx.conf", parsed)
}

/// `server { listen 80; }`
pub fn server_payload() -> Payload {
    single(vec![block("server", &[], vec![leaf("listen", &["80"])])])
}

/// Three units:
///
/// ```text
/// nginx.conf:
///   # main config
///   user www;
///   events { worker_connections 1024; }
///   http {
///       include mime.types;            -> unit 1
///       sendfile on;
///       server {
///           listen 80;
///           server_name example.com;
///           location / { root /srv/www; }
///           location /api { proxy_pass http://backend; }
///       }
///       include conf.d/*.conf;         -> unit 2
///   }
/// mime.types:
///   types { text/html html; }
/// conf.d/admin.conf:
///   server { listen 8080; server_name admin.example.com; }
/// ```
pub fn site_payload() -> Payload {
    payload(vec![
        file(
            "nginx.conf",
            vec![
                comment(" main config"),
                leaf("user", &["www"]),
                block("events", &[], vec![leaf("worker_connections", &["1024"])]),
                block(
                    "http",
                    &[],
                    vec![
                        include("mime.types", &[1]),
                        leaf("sendfile", &["on"]),
                        block(
                            "server",
                            &[],
                            vec![
                                leaf("listen", &["80"]),
                                leaf("server_name", &["example.com"]),
                                block("location", &["/"], vec![leaf("root", &["/srv/www"])]),
                                block("location", &["/api"], vec![leaf("proxy_pass", &["http://backend"])]),
                            ],
                        ),
                        include("conf.d/*.conf", &[2]),
                    ],
                ),
            ],
        ),
        file("mime.types", vec![block("types", &[], vec![leaf("text/html", &["html"])])]),
        file(
            "conf.d/admin.conf",
            vec![block(
                "server",
                &[],
                vec![leaf("listen", &["8080"]), leaf("server_name", &["admin.example.com"])],
            )],
        ),
    ])
}

/// Every path [`site_payload`] indexes under the default key policy, sorted
pub const SITE_PATHS: &[&str] = &[
    "/events",
    "/events/worker_connections",
    "/http",
    "/http/sendfile",
    "/http/server",
    "/http/server/listen",
    "/http/server/location %2F",
    "/http/server/location %2F/root",
    "/http/server/location %2Fapi",
    "/http/server/location %2Fapi/proxy_pass",
    "/http/server/server_name",
    "/http/types",
    "/http/types/text%2Fhtml",
    "/user",
];

/// One unit included from two blocks:
///
/// ```text
/// nginx.conf:
///   http { include common.conf; sendfile on; }
///   stream { include common.conf; }
/// common.conf:
///   resolver 1.1.1.1;
///   if $bad { return 404; }
/// ```
pub fn shared_include_payload() -> Payload {
    payload(vec![
        file(
            "nginx.conf",
            vec![
                block("http", &[], vec![include("common.conf", &[1]), leaf("sendfile", &["on"])]),
                block("stream", &[], vec![include("common.conf", &[1])]),
            ],
        ),
        file(
            "common.conf",
            vec![
                leaf("resolver", &["1.1.1.1"]),
                block("if", &["$bad"], vec![leaf("return", &["404"])]),
            ],
        ),
    ])
}

/// A unit included once from a unit that is itself included twice
///
/// ```text
/// nginx.conf:
///   http { include a.conf; }
///   stream { include a.conf; }
/// a.conf:
///   server { include b.conf; }
/// b.conf:
///   listen 80;
/// ```
pub fn nested_shared_include_payload() -> Payload {
    payload(vec![
        file(
            "nginx.conf",
            vec![
                block("http", &[], vec![include("a.conf", &[1])]),
                block("stream", &[], vec![include("a.conf", &[1])]),
            ],
        ),
        file("a.conf", vec![block("server", &[], vec![include("b.conf", &[2])])]),
        file("b.conf", vec![leaf("listen", &["80"])]),
    ])
}
