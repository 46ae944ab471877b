//! Skill pills shown on the landing page.

use serde::Serialize;

/// Icon identifier rendered next to a skill label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkillIcon {
    Rocket,
    Layers,
    BadgeCheck,
    Wallet,
    ShieldCheck,
    Cpu,
    Code2,
    CircuitBoard,
    Globe,
    Server,
    TerminalSquare,
    Database,
    GitBranch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Skill {
    pub label: &'static str,
    pub icon: SkillIcon,
}

const fn skill(label: &'static str, icon: SkillIcon) -> Skill {
    Skill { label, icon }
}

pub const WEB3_SKILLS: &[Skill] = &[
    skill("Solana / Anchor", SkillIcon::Rocket),
    skill("Metaplex / Bubblegum (cNFT)", SkillIcon::Layers),
    skill("Token-2022", SkillIcon::BadgeCheck),
    skill("Wallet Adapter", SkillIcon::Wallet),
    skill("PDA / CPI / Security", SkillIcon::ShieldCheck),
    skill("Agent Kit", SkillIcon::Cpu),
];

pub const WEB2_SKILLS: &[Skill] = &[
    skill("Java / Spring", SkillIcon::Code2),
    skill("Jakarta EE", SkillIcon::CircuitBoard),
    skill("Angular", SkillIcon::Globe),
    skill("PHP / Symfony", SkillIcon::Server),
    skill("Node / Express", SkillIcon::TerminalSquare),
    skill("Prisma / Supabase", SkillIcon::Database),
    skill("CI/CD & Tests", SkillIcon::GitBranch),
];

/// Icon for `label`, searching both groups.
pub fn icon_for(label: &str) -> Option<SkillIcon> {
    WEB3_SKILLS
        .iter()
        .chain(WEB2_SKILLS)
        .find(|s| s.label == label)
        .map(|s| s.icon)
}
