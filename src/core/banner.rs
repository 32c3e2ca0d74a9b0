use crate::core::config::SchemeConfig;
use colored::Colorize;

const ART: [&str; 20] = [
    "....,.........................*............*......",
    "...,............*............../............,,....",
    ".,,.............*...............,.............*...",
    ",,.............,*...............(..............,..",
    ",,.....,......,/*...............(,..............,/",
    ",.....,......,*..,..............,.(,.............*",
    ",....,......./   /.....,......../ *.*,.....*......",
    ",..,,......,,  ,&%%*..,*.....%%%,     *,,...,,....",
    "..,,.....,,       ....,*........        ,*,,,.,,..",
    ",,,..../.          ...,.,......,.,  ,#&@@@&&(,**(,",
    ",***.%@@&@&&&@@/    .,. ,.....,  ,&&###,  / .&&&&&",
    ",.(&&&  %###(#  .%.  ,  ,....,..* @##/.###%   %%%.",
    ",.(%%.  %##, .,(@       /....     &(, ../(&   &   ",
    "*.  ./  *(/*,.//&       *..*       .**,*/%.       ",
    ",,.       &/*,*#.       ,,.                .     .",
    ".**.     ..                           ......... ..",
    ".,*.  ........                         .        ,*",
    "*,,,,.                                        .%&.",
    "*%%###(                                    .######",
    "#########/..                          .,   .(#####",
];

/// The success banner shown once every step has completed.
pub fn render_banner(config: &SchemeConfig) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&format!(
        "\t\t    {}\n\n",
        format!("{}!", config.display_label).bright_magenta().bold()
    ));
    for line in ART {
        out.push_str(&format!("{}\n", line.bright_white()));
    }
    out.push('\n');
    out
}

pub fn print_banner(config: &SchemeConfig) {
    println!("{}", render_banner(config));
}
