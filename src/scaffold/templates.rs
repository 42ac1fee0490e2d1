//! Dart source templates for a generated module
//!
//! Every generated file except the import file is a `part of` the import
//! file, which pulls in the framework packages once for the whole module.

use std::fmt;

/// One generated file of a module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Bloc,
    Event,
    State,
    Screen,
    Import,
    Factory,
}

impl TemplateKind {
    /// All kinds, in generation order
    pub const ALL: [TemplateKind; 6] = [
        TemplateKind::Bloc,
        TemplateKind::Event,
        TemplateKind::State,
        TemplateKind::Screen,
        TemplateKind::Import,
        TemplateKind::Factory,
    ];

    /// Sub-directory of the module that holds this file
    pub fn directory(self) -> &'static str {
        match self {
            Self::Bloc => "bloc",
            Self::Event => "event",
            Self::State => "state",
            Self::Screen => "screen",
            Self::Import => "import",
            Self::Factory => "factory",
        }
    }

    /// `<module>_<suffix>.dart`
    pub fn file_name(self, module: &str) -> String {
        format!("{}_{}.dart", module, self.directory())
    }

    /// Path of the file relative to the module directory
    pub fn relative_path(self, module: &str) -> String {
        format!("{}/{}", self.directory(), self.file_name(module))
    }

    pub fn render(self, module: &str) -> String {
        let class = class_name(module);
        match self {
            Self::Bloc => bloc(module, &class),
            Self::Event => event(module, &class),
            Self::State => state(module, &class),
            Self::Screen => screen(module, &class),
            Self::Import => import(module),
            Self::Factory => factory(module, &class),
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Bloc => "Bloc",
            Self::Event => "Event",
            Self::State => "State",
            Self::Screen => "Screen",
            Self::Import => "Import",
            Self::Factory => "State Factory",
        };
        write!(f, "{}", label)
    }
}

/// `user_profile` -> `UserProfile`; empty segments are dropped
pub fn class_name(module: &str) -> String {
    module
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

fn part_of(module: &str) -> String {
    format!("part of '../import/{}_import.dart';\n", module)
}

fn bloc(module: &str, class: &str) -> String {
    format!(
        "{part}
class {class}Bloc extends BaseBloc {{
    {class}Bloc() : super(
    {class}Factory(),
    initialState: {class}InitialState(),
    ) {{}}

    @override
    void onDispose() {{}}
}}
",
        part = part_of(module),
        class = class
    )
}

fn event(module: &str, class: &str) -> String {
    format!(
        "{part}
class {class}InitialEvent extends BaseEvent {{}}
",
        part = part_of(module),
        class = class
    )
}

fn state(module: &str, class: &str) -> String {
    format!(
        "{part}
class {class}InitialState extends RenderDataState {{
  {class}InitialState() : super(null);
}}
",
        part = part_of(module),
        class = class
    )
}

fn screen(module: &str, class: &str) -> String {
    format!(
        "{part}
class {class}Screen extends StatefulWidget {{
  final {class}Bloc bloc;
  const {class}Screen({{super.key, required this.bloc}});

  @override
  _{class}ScreenState createState() => _{class}ScreenState(bloc);
}}

class _{class}ScreenState extends BaseScreen<{class}Bloc, {class}Screen, dynamic> {{
  _{class}ScreenState(super.bloc);

  @override
  Widget buildWidget(BuildContext context, RenderDataState state) {{
    return Container();
  }}

  @override
  void listenToState(BuildContext context, BaseState state) {{}}
}}
",
        part = part_of(module),
        class = class
    )
}

fn import(module: &str) -> String {
    format!(
        "import 'package:flutter/material.dart';
import 'package:opticore/opticore.dart';

part '../bloc/{m}_bloc.dart';
part '../event/{m}_event.dart';
part '../screen/{m}_screen.dart';
part '../state/{m}_state.dart';
part '../factory/{m}_factory.dart';
",
        m = module
    )
}

fn factory(module: &str, class: &str) -> String {
    format!(
        "{part}
class {class}Factory extends BaseFactory {{
  @override
  BaseState getState<M>(M data) {{
    return DefaultState();
  }}
}}
",
        part = part_of(module),
        class = class
    )
}
