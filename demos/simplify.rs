use clap::Parser;
use color_eyre::eyre::{bail, eyre};

use boolex::atom::Lit;
use boolex::eval::equivalent;
use boolex::expr::Expr;
use boolex::simplify::{Simplifier, SimplifyConfig};
use boolex::types::IdAllocator;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Formulas to simplify, e.g. "1 | (1 & 2)". Atoms are DIMACS literals, `~` negates,
    /// `&` binds tighter than `|`. Without formulas, a built-in set is used.
    #[arg(value_name = "FORMULA")]
    formulas: Vec<String>,

    /// Maximum number of forms explored per formula (0 for unlimited).
    #[clap(long, value_name = "INT", default_value = "10000")]
    max_forms: usize,

    /// Print the simplified tree in DOT format.
    #[clap(long)]
    dot: bool,

    /// Log the search.
    #[clap(short, long)]
    verbose: bool,
}

const BUILTIN: &[&str] = &[
    "1 & 1",
    "1 | (1 & 2) | (1 & 3)",
    "1 & (-1 | 2) & (-1 | 3)",
    "(1 & 2) | (1 & 3) | (1 & 4)",
    "1 & -1",
    "1 | (-1 & 2) | (-1 & -2 & 3)",
    "1 | (2 & (1 | 3))",
    "~(1 | 2) | 1",
];

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        if args.verbose {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();

    println!("args = {:?}", args);

    let simplifier = Simplifier::new(SimplifyConfig {
        max_forms: if args.max_forms == 0 { None } else { Some(args.max_forms) },
        ..SimplifyConfig::default()
    });

    let formulas: Vec<String> = if args.formulas.is_empty() {
        BUILTIN.iter().map(|s| s.to_string()).collect()
    } else {
        args.formulas.clone()
    };

    for text in &formulas {
        println!("----------------------------------");
        let ids = IdAllocator::new();
        let f = parse(text, &ids)?;
        println!("input:  {} (complexity {})", f, f.complexity());

        let time = std::time::Instant::now();
        let g = simplifier.simplify(&f, &ids);
        let elapsed = time.elapsed();
        println!("output: {} (complexity {})", g, g.complexity());
        println!("ids allocated: {}", ids.allocated());
        println!("time: {:.3} ms", elapsed.as_secs_f64() * 1000.0);

        let num_vars = f.atoms().iter().map(|lit| lit.var().id()).max().unwrap_or(0);
        if num_vars <= 16 {
            let ok = equivalent(&f, &g, num_vars);
            println!("equivalent: {}", ok);
            if !ok {
                bail!("simplified form of {:?} is not equivalent", text);
            }
        }

        if args.dot {
            println!("{}", g.to_dot()?);
        }
    }

    println!("\nAll done in {:.3} s", time_total.elapsed().as_secs_f64());
    Ok(())
}

fn parse(text: &str, ids: &IdAllocator) -> color_eyre::Result<Expr<Lit>> {
    let tokens = tokenize(text)?;
    let mut parser = FormulaParser { tokens, pos: 0, ids };
    let expr = parser.disjunction()?;
    if parser.pos != parser.tokens.len() {
        bail!("unexpected {:?} in {:?}", parser.tokens[parser.pos], text);
    }
    Ok(expr)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Lit(i32),
    True,
    False,
    And,
    Or,
    Not,
    Open,
    Close,
}

fn tokenize(text: &str) -> color_eyre::Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(&ch) = chars.peek() {
        match ch {
            ' ' | '\t' => {
                chars.next();
            }
            '&' => {
                chars.next();
                tokens.push(Token::And);
            }
            '|' => {
                chars.next();
                tokens.push(Token::Or);
            }
            '~' | '!' => {
                chars.next();
                tokens.push(Token::Not);
            }
            '(' => {
                chars.next();
                tokens.push(Token::Open);
            }
            ')' => {
                chars.next();
                tokens.push(Token::Close);
            }
            '-' | '0'..='9' => {
                let mut number = String::new();
                number.push(ch);
                chars.next();
                while let Some(&d) = chars.peek().filter(|d| d.is_ascii_digit()) {
                    number.push(d);
                    chars.next();
                }
                let value: i32 = number.parse()?;
                if value == 0 {
                    bail!("variable 0 is not allowed");
                }
                tokens.push(Token::Lit(value));
            }
            'a'..='z' => {
                let mut word = String::new();
                while let Some(&c) = chars.peek().filter(|c| c.is_ascii_alphabetic()) {
                    word.push(c);
                    chars.next();
                }
                match word.as_str() {
                    "true" => tokens.push(Token::True),
                    "false" => tokens.push(Token::False),
                    _ => bail!("unknown word {:?}", word),
                }
            }
            _ => bail!("unexpected character {:?}", ch),
        }
    }
    Ok(tokens)
}

struct FormulaParser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    ids: &'a IdAllocator,
}

impl FormulaParser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn disjunction(&mut self) -> color_eyre::Result<Expr<Lit>> {
        let mut terms = vec![self.conjunction()?];
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            terms.push(self.conjunction()?);
        }
        Ok(if terms.len() == 1 {
            terms.remove(0)
        } else {
            Expr::or(self.ids, terms)
        })
    }

    fn conjunction(&mut self) -> color_eyre::Result<Expr<Lit>> {
        let mut factors = vec![self.unary()?];
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            factors.push(self.unary()?);
        }
        Ok(if factors.len() == 1 {
            factors.remove(0)
        } else {
            Expr::and(self.ids, factors)
        })
    }

    fn unary(&mut self) -> color_eyre::Result<Expr<Lit>> {
        match self.next() {
            Some(Token::Not) => Ok(self.unary()?.inverse()?),
            Some(Token::Lit(v)) => Ok(Expr::atom(self.ids, Lit::from_dimacs(v))),
            Some(Token::True) => Ok(Expr::universal(self.ids)),
            Some(Token::False) => Ok(Expr::empty_set(self.ids)),
            Some(Token::Open) => {
                let inner = self.disjunction()?;
                match self.next() {
                    Some(Token::Close) => Ok(inner),
                    other => Err(eyre!("expected ')', found {:?}", other)),
                }
            }
            other => Err(eyre!("expected operand, found {:?}", other)),
        }
    }
}
