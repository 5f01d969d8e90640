use crate::cli::ReplayArgs;
use crate::config::build_engine_config;
use crate::error::{CliError, Result};
use crate::script::{Script, Step};
use nalgebra::Point2;
use nucleokit::core::models::component::Moiety;
use nucleokit::core::models::ids::ComponentId;
use nucleokit::engine::config::EngineConfig;
use nucleokit::engine::drag::DragOutcome;
use nucleokit::engine::error::EngineError;
use nucleokit::engine::session::{AssemblyEngine, SelectionOutcome};
use std::collections::HashMap;
use tracing::{debug, info, warn};

pub fn run(args: ReplayArgs) -> Result<()> {
    let config = build_engine_config(&args)?;

    info!("Loading session script from {:?}", &args.script);
    let script = Script::load(&args.script)?;
    println!(
        "Replaying {} step(s) from {}",
        script.len(),
        args.script.display()
    );

    let mut replayer = Replayer::new(config);
    for (index, step) in script.steps.iter().enumerate() {
        let line = replayer.apply(index + 1, step)?;
        println!("  [{:>3}] {}", index + 1, line);
    }

    info!(
        rejected = replayer.rejected(),
        "Replay finished with {} component(s).",
        replayer.engine().assembly().len()
    );
    print!("{}", replayer.summary());
    Ok(())
}

/// Drives an [`AssemblyEngine`] from script steps, resolving script names to ids.
///
/// Rejected connections are reported and counted; any other engine failure aborts the
/// replay with the failing step number.
pub struct Replayer {
    engine: AssemblyEngine,
    names: HashMap<String, ComponentId>,
    rejected: usize,
}

impl Replayer {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            engine: AssemblyEngine::new(config),
            names: HashMap::new(),
            rejected: 0,
        }
    }

    pub fn engine(&self) -> &AssemblyEngine {
        &self.engine
    }

    pub fn id_of(&self, name: &str) -> Option<ComponentId> {
        self.names.get(name).copied()
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }

    fn resolve(&self, step: usize, name: &str) -> Result<ComponentId> {
        self.id_of(name).ok_or_else(|| CliError::Script {
            step,
            message: format!("unknown component '{}'", name),
        })
    }

    fn name_of(&self, id: ComponentId) -> String {
        self.names
            .iter()
            .find(|&(_, &known)| known == id)
            .map(|(name, _)| name.clone())
            .or_else(|| self.engine.component(id).map(|c| c.label.clone()))
            .unwrap_or_else(|| format!("{:?}", id))
    }

    fn forget(&mut self, id: ComponentId) {
        self.names.retain(|_, known| *known != id);
    }

    fn fail(step: usize, err: EngineError) -> CliError {
        CliError::Script {
            step,
            message: err.to_string(),
        }
    }

    /// Runs one step and returns a one-line description of what happened.
    pub fn apply(&mut self, step: usize, action: &Step) -> Result<String> {
        debug!(step, action = action.action(), "Applying script step.");
        match action {
            Step::Create {
                name,
                component,
                at,
            } => {
                if self.names.contains_key(name) {
                    return Err(CliError::Script {
                        step,
                        message: format!("component '{}' already exists", name),
                    });
                }
                let moiety: Moiety = component.parse().map_err(|e| CliError::Script {
                    step,
                    message: format!("{}", e),
                })?;
                let id = match at {
                    Some([x, y]) => self.engine.place_component(moiety, Point2::new(*x, *y)),
                    None => self.engine.create_component(moiety),
                };
                self.names.insert(name.clone(), id);
                Ok(format!("created {} ({})", name, moiety))
            }
            Step::Connect { a, b } => {
                let (id_a, id_b) = (self.resolve(step, a)?, self.resolve(step, b)?);
                match self.engine.connect(id_a, id_b) {
                    Ok(bond) => Ok(format!("connected {} - {} ({})", a, b, bond.description())),
                    Err(err) => match err.rejection() {
                        Some(reason) => {
                            self.rejected += 1;
                            warn!(step, %reason, "Connection rejected.");
                            Ok(format!("rejected {} - {}: {}", a, b, reason))
                        }
                        None => Err(Self::fail(step, err)),
                    },
                }
            }
            Step::Disconnect { a, b } => {
                let (id_a, id_b) = (self.resolve(step, a)?, self.resolve(step, b)?);
                if self.engine.disconnect(id_a, id_b) {
                    Ok(format!("disconnected {} - {}", a, b))
                } else {
                    Ok(format!("{} and {} were not connected", a, b))
                }
            }
            Step::Remove { target } => {
                let id = self.resolve(step, target)?;
                self.engine
                    .remove_component(id)
                    .map_err(|e| Self::fail(step, e))?;
                self.forget(id);
                Ok(format!("removed {}", target))
            }
            Step::Detach { target } => {
                let id = self.resolve(step, target)?;
                let removed = self
                    .engine
                    .detach_all(id)
                    .map_err(|e| Self::fail(step, e))?;
                Ok(format!("detached {} ({} connection(s))", target, removed))
            }
            Step::Drag { target, by } => {
                let id = self.resolve(step, target)?;
                self.engine.begin_drag(id).map_err(|e| Self::fail(step, e))?;
                self.engine
                    .apply_drag_delta(by[0], by[1])
                    .map_err(|e| Self::fail(step, e))?;
                match self.engine.end_drag().map_err(|e| Self::fail(step, e))? {
                    DragOutcome::Removed { anchor, .. } => {
                        self.forget(anchor);
                        Ok(format!("dragged {} off the canvas and removed it", target))
                    }
                    DragOutcome::Assembled { links } => {
                        let formed: Vec<String> = links
                            .iter()
                            .map(|link| format!("{} - {}", self.name_of(link.a), self.name_of(link.b)))
                            .collect();
                        if formed.is_empty() {
                            Ok(format!("dragged {} by ({}, {})", target, by[0], by[1]))
                        } else {
                            Ok(format!(
                                "dragged {} by ({}, {}), auto-assembled {}",
                                target,
                                by[0],
                                by[1],
                                formed.join(", ")
                            ))
                        }
                    }
                }
            }
            Step::Rotate { pivot, degrees } => {
                let id = self.resolve(step, pivot)?;
                self.engine
                    .start_rotation(id)
                    .map_err(|e| Self::fail(step, e))?;
                self.engine
                    .apply_rotation(*degrees)
                    .map_err(|e| Self::fail(step, e))?;
                self.engine.stop_rotation().map_err(|e| Self::fail(step, e))?;
                Ok(format!("rotated group of {} by {} degrees", pivot, degrees))
            }
            Step::Select { target } => {
                let id = self.resolve(step, target)?;
                let outcome = self
                    .engine
                    .select_for_connection(id)
                    .map_err(|e| Self::fail(step, e))?;
                Ok(match outcome {
                    SelectionOutcome::Selected(_) => format!("selected {}", target),
                    SelectionOutcome::Cancelled(_) => format!("deselected {}", target),
                    SelectionOutcome::Connected { a, b, bond } => format!(
                        "connected {} - {} ({})",
                        self.name_of(a),
                        self.name_of(b),
                        bond.description()
                    ),
                    SelectionOutcome::Rejected { a, b, reason } => {
                        self.rejected += 1;
                        format!(
                            "rejected {} - {}: {}",
                            self.name_of(a),
                            self.name_of(b),
                            reason
                        )
                    }
                })
            }
            Step::Cancel => {
                if self.engine.cancel() {
                    Ok("cancelled the active mode".to_string())
                } else {
                    Ok("nothing to cancel".to_string())
                }
            }
            Step::Pair => {
                let report = self.engine.validate_pairing();
                if report.is_insufficient() {
                    Ok(format!(
                        "pairing needs two complete chains, found {}",
                        report.complete_chains
                    ))
                } else {
                    let pairs: Vec<String> = report
                        .pairs
                        .iter()
                        .map(|pair| {
                            format!(
                                "{}:{} - {}:{}",
                                self.name_of(pair.first_base),
                                pair.letters.0,
                                self.name_of(pair.second_base),
                                pair.letters.1
                            )
                        })
                        .collect();
                    Ok(format!(
                        "paired {} chain(s) [{}], cleared {} old pairing(s)",
                        report.count(),
                        pairs.join(", "),
                        report.cleared
                    ))
                }
            }
            Step::Reset => {
                self.engine.reset_all();
                self.names.clear();
                Ok("reset the workspace".to_string())
            }
        }
    }

    /// Multi-line description of the final graph.
    pub fn summary(&self) -> String {
        let assembly = self.engine.assembly();
        let mut out = String::new();

        out.push_str(&format!("\nComponents ({}):\n", assembly.len()));
        let mut named: Vec<(String, ComponentId)> = assembly
            .components_iter()
            .map(|(id, _)| (self.name_of(id), id))
            .collect();
        named.sort();
        for (name, id) in &named {
            if let Some(component) = assembly.component(*id) {
                out.push_str(&format!(
                    "  {:<12} {:<18} at ({:.1}, {:.1}) rot {:.1}{}\n",
                    name,
                    component.moiety.to_string(),
                    component.position.x,
                    component.position.y,
                    component.rotation_deg(),
                    if component.is_chained() { "" } else { " (unchained)" }
                ));
            }
        }

        let edges = assembly.edges();
        out.push_str(&format!("Connections ({}):\n", edges.len()));
        for (a, b, bond) in edges {
            out.push_str(&format!(
                "  {} - {}: {}\n",
                self.name_of(a),
                self.name_of(b),
                bond.description()
            ));
        }

        let chains: Vec<_> = assembly.chains_iter().collect();
        out.push_str(&format!("Chains ({}):\n", chains.len()));
        for (_, chain) in chains {
            let members: Vec<String> = chain.members().iter().map(|&id| self.name_of(id)).collect();
            out.push_str(&format!(
                "  [{}]{}\n",
                members.join(", "),
                if chain.is_complete() { " complete" } else { "" }
            ));
        }

        if self.rejected > 0 {
            out.push_str(&format!("Rejected connections: {}\n", self.rejected));
        }
        out
    }
}
