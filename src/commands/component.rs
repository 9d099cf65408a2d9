//! `semactl component` - reconcile any component with the standard CRUD shape

use crate::Context;
use crate::cli::ComponentArgs;
use anyhow::Result;
use reconcile::transport::http::UreqTransport;
use reconcile::{AttributeSet, Collection, Descriptor, TargetState, converge, kinds};
use std::process::ExitCode;

pub fn run(ctx: &Context, args: ComponentArgs) -> Result<ExitCode> {
    let state = TargetState::from(args.state);
    let (descriptor, params) = build(ctx, &args);
    let result = converge(
        &descriptor,
        &params,
        &ctx.url(),
        &ctx.token(),
        state,
        UreqTransport::new(),
    );
    super::report(ctx, result)
}

/// Build a descriptor declaring the `--set` keys, and the matching parameters
fn build(ctx: &Context, args: &ComponentArgs) -> (Box<dyn Descriptor>, AttributeSet) {
    let collection = Collection::new(kind_of(&args.path), &args.path)
        .attributes(args.set.iter().map(|(key, _)| key.clone()));

    let mut params: AttributeSet = args.set.iter().cloned().collect();
    params.insert("name", args.name.as_str());

    let project_id = if args.unscoped {
        None
    } else {
        ctx.config.project_id(args.project_id)
    };

    let descriptor: Box<dyn Descriptor> = match project_id {
        Some(project_id) => {
            params.insert("project_id", project_id);
            Box::new(kinds::project_component(collection))
        }
        None => Box::new(collection),
    };
    (descriptor, params)
}

/// Last path segment, used as the kind in log messages
fn kind_of(path: &str) -> String {
    path.trim_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("component")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::State;
    use crate::config::Config;
    use reconcile::AttributeValue;

    fn ctx(project_id: Option<i64>) -> Context {
        Context {
            quiet: true,
            url: None,
            token: None,
            config_path: None,
            config: Config {
                project_id,
                ..Config::default()
            },
        }
    }

    fn args(project_id: Option<i64>, unscoped: bool) -> ComponentArgs {
        ComponentArgs {
            path: "/keys".to_string(),
            name: "deploy".to_string(),
            project_id,
            unscoped,
            set: vec![
                ("type".to_string(), AttributeValue::from("ssh")),
                ("name".to_string(), AttributeValue::from("ignored")),
            ],
            state: State::Present,
        }
    }

    #[test]
    fn test_kind_of() {
        assert_eq!(kind_of("/keys"), "keys");
        assert_eq!(kind_of("/project/1/keys/"), "keys");
        assert_eq!(kind_of("/"), "component");
    }

    #[test]
    fn test_build_scoped() {
        let (descriptor, params) = build(&ctx(None), &args(Some(2), false));
        let shape = descriptor.shape(&params).unwrap();

        assert_eq!(descriptor.kind(), "keys");
        assert_eq!(shape.path, "/project/2/keys");
        assert_eq!(shape.attributes.name(), Some("deploy"));
        assert_eq!(shape.attributes.keys().collect::<Vec<_>>(), vec!["name", "type"]);
    }

    #[test]
    fn test_build_uses_config_project() {
        let (descriptor, params) = build(&ctx(Some(5)), &args(None, false));
        assert_eq!(descriptor.shape(&params).unwrap().path, "/project/5/keys");
    }

    #[test]
    fn test_build_unscoped() {
        let (descriptor, params) = build(&ctx(Some(5)), &args(None, true));
        let shape = descriptor.shape(&params).unwrap();
        assert_eq!(shape.path, "/keys");
        assert!(!params.contains("project_id"));
    }
}
