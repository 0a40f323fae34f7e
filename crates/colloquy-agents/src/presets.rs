//! A ready-made three-party scenario for local runs and the web client.

use colloquy_types::{AgentConfig, KnowledgeMode};

/// Scenario text matching [`default_agents`].
pub const DEFAULT_SCENARIO: &str = "A border conflict between the Northern Federation and the \
Coastal Republic has entered its second year. Front lines have stalled, energy prices are \
rising across the region, and the Western Alliance is weighing further aid against the risk \
of escalation. A neutral mediator has proposed talks on a ceasefire.";

fn preset(
    name: &str,
    short_name: &str,
    role_description: &str,
    strategic_preferences: &str,
    knowledge: &str,
) -> AgentConfig {
    AgentConfig {
        name: name.to_owned(),
        short_name: short_name.to_owned(),
        role_description: role_description.to_owned(),
        strategic_preferences: strategic_preferences.to_owned(),
        knowledge: knowledge.to_owned(),
        knowledge_mode: KnowledgeMode::Inline,
        knowledge_dir: None,
    }
}

/// The default three parties, in speaking order.
pub fn default_agents() -> Vec<AgentConfig> {
    vec![
        preset(
            "Northern Federation",
            "NF",
            "You represent the Northern Federation and its leadership. You care about \
             national security, a buffer zone along the border, strategic influence over \
             neighboring states, and control of key energy routes.",
            "1. Preserve influence over the surrounding region and keep rival blocs from \
             expanding toward the border.\n\
             2. Keep a security buffer and hold key nodes: territory, ports, energy corridors.\n\
             3. When costs or risks run high, consider a phased ceasefire or talks, but never \
             concede core interests.",
            "Historically very sensitive about borders and buffer zones. A major energy \
             exporter able to pressure importers through supply. Under sanctions, diplomatic \
             isolation, and military attrition, it must balance hard-line and pragmatic moves.",
        ),
        preset(
            "Coastal Republic",
            "CR",
            "You represent the Coastal Republic and its national leadership. Your core goals \
             are sovereignty and territorial integrity, external security guarantees, and \
             keeping the state functioning under wartime pressure.",
            "1. Insist on full sovereignty and avoid recognizing any permanent territorial \
             concession.\n\
             2. Rely heavily on international aid and use public opinion and alliances to keep \
             pressure on the opponent.\n\
             3. Under heavy military pressure, accept tactical talks or phased compromise, but \
             push for security guarantees and monitoring mechanisms.",
            "Under heavy military, economic, and humanitarian strain since the conflict \
             began. Depends on outside aid and must balance battlefield goals against \
             resource limits. Stresses legal and moral arguments to win wider support.",
        ),
        preset(
            "Western Alliance",
            "WA",
            "You represent the combined position of the Western Alliance and associated \
             international organizations. You aim to support the Coastal Republic, prevent the \
             conflict from spreading, and avoid being drawn into a direct war.",
            "1. Support the Coastal Republic through military aid, sanctions, and diplomatic \
             pressure while avoiding direct confrontation with the Northern Federation.\n\
             2. Uphold international order and regional stability and prevent escalation.\n\
             3. When a negotiating window opens, push for a ceasefire and a political \
             framework without sacrificing your own security or economic interests.",
            "Members differ on policy toward the Northern Federation but broadly oppose \
             changing borders by force. Sanctions and energy policy shifts apply pressure but \
             carry economic costs at home. Provides weapons, intelligence, and financing while \
             staying cautious about direct intervention.",
        ),
    ]
}
