#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    left,
    right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    addition,
    subtraction,
    multiplication,
    division,
    exponentiation,
}

impl BinaryOperator {
    pub fn call(&self, left: f64, right: f64) -> f64 {
        use BinaryOperator::*;

        match self {
            addition => left + right,
            subtraction => left - right,
            multiplication => left * right,
            division => left / right,
            exponentiation => left.powf(right),
        }
    }

    pub fn precedence(&self) -> u8 {
        use BinaryOperator::*;
        match self {
            addition | subtraction => 1,
            multiplication | division => 2,
            exponentiation => 3,
        }
    }

    pub fn associativity(&self) -> Associativity {
        match self {
            Self::exponentiation => Associativity::right,
            _ => Associativity::left,
        }
    }

    pub fn symbol(&self) -> char {
        use BinaryOperator::*;
        match self {
            addition => '+',
            subtraction => '-',
            multiplication => '*',
            division => '/',
            exponentiation => '^',
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct InvalidOperator;

impl TryFrom<u8> for BinaryOperator {
    type Error = InvalidOperator;

    fn try_from(c: u8) -> Result<Self, Self::Error> {
        use BinaryOperator::*;
        match c {
            b'+' => Ok(addition),
            b'-' => Ok(subtraction),
            b'*' => Ok(multiplication),
            b'/' => Ok(division),
            b'^' => Ok(exponentiation),
            _ => Err(InvalidOperator),
        }
    }
}

/// Delimiters. They all have precedence 0 and never combine arithmetically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punctuation {
    open_paren,
    close_paren,
    comma,
}

impl Punctuation {
    pub fn symbol(&self) -> char {
        match self {
            Self::open_paren => '(',
            Self::close_paren => ')',
            Self::comma => ',',
        }
    }
}

impl TryFrom<u8> for Punctuation {
    type Error = InvalidOperator;

    fn try_from(c: u8) -> Result<Self, Self::Error> {
        match c {
            b'(' => Ok(Self::open_paren),
            b')' => Ok(Self::close_paren),
            b',' => Ok(Self::comma),
            _ => Err(InvalidOperator),
        }
    }
}
