use crate::{recognize::tsv::TsvRow, symbolic::Expr};

/// Constructor for a binary arithmetic node.
type BinaryOp = fn(Box<Expr>, Box<Expr>) -> Expr;

peg::parser! {
    /// Grammars for worksheet arithmetic and tesseract TSV output.
    pub grammar parser() for str {
        /// optional horizontal whitespace
        rule _() = quiet!{[' ' | '\t']*}

        /// one or more ascii digits
        rule digits() = ['0'..='9']+

        /// integers and decimals, including `.5` and `5.`
        rule number() -> Expr
            = n:$(digits() ("." digits()?)? / "." digits())
            {? Expr::decimal(n).ok_or("number") }

        /// addition
        rule plus() = "+"

        /// ascii hyphen or the unicode minus sign
        rule minus() = "-" / "−"

        /// `*`, `×` or `·`, but never the first half of `**`
        rule times() = "*" !"*" / "×" / "·"

        /// `/` or `÷`
        rule divide() = "/" / "÷"

        /// `^` or `**`
        rule power() = "^" / "**"

        /// a number or a parenthesised sum
        rule atom() -> Expr
            = number()
            / "(" _ e:sum() _ ")" { e }

        /// right-associative exponentiation; the exponent may carry a sign
        rule exponential() -> Expr
            = b:atom() e:(_ power() _ e:unary() { e })?
            {
                match e {
                    Some(e) => Expr::Pow(Box::new(b), Box::new(e)),
                    None => b,
                }
            }

        /// prefix signs bind looser than `^`, so `-2^2` is `-(2^2)`
        rule unary() -> Expr
            = minus() _ u:unary() { Expr::Neg(Box::new(u)) }
            / plus() _ u:unary() { u }
            / exponential()

        /// left-associative `*` and `/`
        rule product() -> Expr
            = first:unary() rest:(_ op:product_op() _ r:unary() { (op, r) })*
            { rest.into_iter().fold(first, |acc, (op, r)| op(Box::new(acc), Box::new(r))) }

        /// picks the constructor for a `*` or `/`
        rule product_op() -> BinaryOp
            = times() { Expr::Mul as BinaryOp }
            / divide() { Expr::Div as BinaryOp }

        /// left-associative `+` and `-`
        rule sum() -> Expr
            = first:product() rest:(_ op:sum_op() _ r:product() { (op, r) })*
            { rest.into_iter().fold(first, |acc, (op, r)| op(Box::new(acc), Box::new(r))) }

        /// picks the constructor for a `+` or `-`
        rule sum_op() -> BinaryOp
            = plus() { Expr::Add as BinaryOp }
            / minus() { Expr::Sub as BinaryOp }

        /// parses a complete arithmetic expression
        pub rule expression() -> Expr
            = _ e:sum() _ { e }

        /// an unsigned column value
        rule unsigned() -> u32
            = n:$(digits()) {? n.parse().or(Err("u32")) }

        /// tesseract reports `-1` for rows without a confidence
        rule confidence() -> f32
            = n:$("-"? digits() ("." digits()?)?) {? n.parse().or(Err("f32")) }

        /// column separator
        rule tab() = "\t"

        /// the free-text column, running to the end of the line
        rule text() -> &'input str
            = $([^ '\n' | '\r']*)

        /// parses one data row of `tesseract ... tsv` output
        pub rule tsv_row() -> TsvRow
            = level:unsigned() tab()
              page:unsigned() tab()
              block:unsigned() tab()
              paragraph:unsigned() tab()
              line:unsigned() tab()
              word:unsigned() tab()
              left:unsigned() tab()
              top:unsigned() tab()
              width:unsigned() tab()
              height:unsigned() tab()
              conf:confidence()
              text:(tab() t:text() { t })?
              ['\r']?
            {
                TsvRow {
                    level,
                    page,
                    block,
                    paragraph,
                    line,
                    word,
                    left,
                    top,
                    width,
                    height,
                    confidence: (conf >= 0.0).then_some(conf),
                    text: text.unwrap_or_default().to_string(),
                }
            }
    }
}
