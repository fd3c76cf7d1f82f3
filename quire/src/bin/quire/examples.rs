use crate::commands::{group, post, social, user};

#[derive(Clone, Copy)]
pub struct ExampleGroup {
    pub title: &'static str,
    pub commands: &'static [&'static str],
}

#[derive(Clone, Copy)]
pub struct CommandExample {
    pub name: &'static str,
    pub groups: &'static [ExampleGroup],
}

pub fn command_examples() -> &'static [CommandExample] {
    &[
        CommandExample {
            name: "user",
            groups: user::EXAMPLES,
        },
        CommandExample {
            name: "group",
            groups: group::EXAMPLES,
        },
        CommandExample {
            name: "post",
            groups: post::EXAMPLES,
        },
        CommandExample {
            name: "follow",
            groups: social::FOLLOW_EXAMPLES,
        },
        CommandExample {
            name: "unfollow",
            groups: social::UNFOLLOW_EXAMPLES,
        },
    ]
}
