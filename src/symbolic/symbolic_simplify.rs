//! # Symbolic Expression Simplification Module
//!
//! Canonical simplification of symbolic expressions. An expression is brought to a sum of
//! products: every term is a numeric coefficient times a product of atoms raised to numeric
//! powers. Two expressions that are equal under the rewrite rules below end up structurally
//! identical, so `(a - b).simplify().is_zero()` is a usable equality test.
//!
//! ## Simplification Strategy
//!
//! 1. **Constant Folding**: arithmetic and elementary functions of numeric constants are evaluated
//! 2. **Like Term Collection**: terms with the same monomial are merged, zero terms dropped
//! 3. **Expansion**: products of sums and sums raised to small integer powers are expanded
//! 4. **Exponentials**: `exp(a)*exp(b)` becomes `exp(a + b)`, `exp(ln(a))` becomes `a`
//! 5. **Trigonometry**: parity of `sin` and `cos`, integer multiple angles, `tg`/`ctg` as
//!    quotients and `cos(a)^2 = 1 - sin(a)^2`
//! 6. **Roots**: `(a^p)^c` becomes `a^(p*c)` only for integer `c` or when `p` is `±1`, fractional
//!    or belongs to `exp`; otherwise `a^p` raised to the fractional part of `c` stays an atom, so
//!    `sqrt(x^2)` is not `x`
//!
//! Variables, applications of undetermined functions, deferred derivatives and anything the
//! rules do not cover are atoms; their arguments are simplified recursively.
//!
//! Integer-valued coefficients and exponents are snapped to exact integers, so round-off from
//! constant folding does not create spurious distinct terms.

use crate::symbolic::symbolic_engine::Expr;
use std::collections::BTreeMap;

/// Tunable limits of the canonical simplifier
#[derive(Clone, Debug, PartialEq)]
pub struct SimplifySettings {
    /// terms with a coefficient smaller than this in absolute value are dropped
    pub zero_tolerance: f64,
    /// largest integer power of a sum that is expanded
    pub max_expand_power: u32,
    /// largest integer multiple angle of sin/cos that is expanded
    pub max_multiple_angle: u32,
}

impl Default for SimplifySettings {
    fn default() -> Self {
        SimplifySettings {
            zero_tolerance: 1e-12,
            max_expand_power: 8,
            max_multiple_angle: 8,
        }
    }
}

const INTEGER_SNAP: f64 = 1e-10;

/// snaps nearly integer values to the integer and turns -0.0 into 0.0
fn snap(x: f64) -> f64 {
    let r = x.round();
    if (x - r).abs() < INTEGER_SNAP * r.abs().max(1.0) {
        r + 0.0
    } else {
        x
    }
}

fn is_integer(x: f64) -> bool {
    x.is_finite() && x.fract() == 0.0
}

/// Atom raised to a numeric power
#[derive(Clone, Debug, PartialEq)]
struct Factor {
    base: Expr,
    exponent: f64,
}

/// Coefficient times a product of factors keyed by the printed form of their base
#[derive(Clone, Debug, PartialEq)]
struct Term {
    coeff: f64,
    factors: BTreeMap<String, Factor>,
}

/// Represents the non-numeric part of a term (monomial).
///
/// Pairs of (printed base, printed exponent) in base order; `3*x^2*y` has the key
/// `[("x", "2"), ("y", "1")]` and a numeric constant has the empty key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct MonomialKey(pub Vec<(String, String)>);

impl Term {
    fn constant(coeff: f64) -> Term {
        Term {
            coeff,
            factors: BTreeMap::new(),
        }
    }

    fn key(&self) -> MonomialKey {
        MonomialKey(
            self.factors
                .iter()
                .map(|(k, f)| (k.clone(), f.exponent.to_string()))
                .collect(),
        )
    }

    fn mul(&self, other: &Term) -> Term {
        let mut factors = self.factors.clone();
        for (key, factor) in &other.factors {
            factors
                .entry(key.clone())
                .and_modify(|f| f.exponent = snap(f.exponent + factor.exponent))
                .or_insert_with(|| factor.clone());
        }
        factors.retain(|_, f| f.exponent != 0.0);
        Term {
            coeff: snap(self.coeff * other.coeff),
            factors,
        }
    }
}

/// Sum of terms indexed by monomial
#[derive(Clone, Debug, PartialEq)]
struct Polynomial {
    terms: BTreeMap<MonomialKey, Term>,
}

impl Polynomial {
    fn zero() -> Polynomial {
        Polynomial {
            terms: BTreeMap::new(),
        }
    }

    fn from_term(term: Term, tol: f64) -> Polynomial {
        let mut p = Polynomial::zero();
        p.add_term(term, tol);
        p
    }

    fn constant(c: f64, tol: f64) -> Polynomial {
        Polynomial::from_term(Term::constant(c), tol)
    }

    fn add_term(&mut self, term: Term, tol: f64) {
        let key = term.key();
        let coeff = match self.terms.get(&key) {
            Some(existing) => snap(existing.coeff + term.coeff),
            None => term.coeff,
        };
        if coeff.abs() < tol {
            self.terms.remove(&key);
        } else {
            self.terms.insert(key, Term { coeff, ..term });
        }
    }

    fn scale(&self, k: f64, tol: f64) -> Polynomial {
        let mut p = Polynomial::zero();
        for term in self.terms.values() {
            p.add_term(
                Term {
                    coeff: snap(term.coeff * k),
                    factors: term.factors.clone(),
                },
                tol,
            );
        }
        p
    }

    /// numeric value if the polynomial has no symbolic part (the empty polynomial is 0)
    fn as_constant(&self) -> Option<f64> {
        match self.terms.len() {
            0 => Some(0.0),
            1 => self
                .terms
                .values()
                .next()
                .filter(|t| t.factors.is_empty())
                .map(|t| t.coeff),
            _ => None,
        }
    }

    fn single_term(&self) -> Option<&Term> {
        if self.terms.len() == 1 {
            self.terms.values().next()
        } else {
            None
        }
    }

    /// `Some(k)` if `self == k * other` with both having more than one term
    fn ratio_to(&self, other: &Polynomial) -> Option<f64> {
        if self.terms.len() != other.terms.len() || self.terms.is_empty() {
            return None;
        }
        let mut ratio: Option<f64> = None;
        for (key, term) in &self.terms {
            let other_term = other.terms.get(key)?;
            let r = term.coeff / other_term.coeff;
            match ratio {
                None => ratio = Some(r),
                Some(prev) if (prev - r).abs() <= 1e-12 * prev.abs().max(1.0) => {}
                Some(_) => return None,
            }
        }
        ratio.map(snap)
    }
}

/// Builds canonical polynomials from expressions and back
struct Canonicalizer<'a> {
    settings: &'a SimplifySettings,
}

impl<'a> Canonicalizer<'a> {
    fn tol(&self) -> f64 {
        self.settings.zero_tolerance
    }

    fn constant(&self, c: f64) -> Polynomial {
        Polynomial::constant(snap(c), self.tol())
    }

    fn atom_pow(&self, base: Expr, exponent: f64) -> Polynomial {
        if let Expr::Const(c) = base {
            return self.constant(c.powf(exponent));
        }
        let mut factors = BTreeMap::new();
        factors.insert(base.to_string(), Factor { base, exponent });
        Polynomial::from_term(Term { coeff: 1.0, factors }, self.tol())
    }

    fn atom(&self, base: Expr) -> Polynomial {
        self.atom_pow(base, 1.0)
    }

    fn canonical(&self, e: &Expr) -> Expr {
        self.from_poly(&self.to_poly(e))
    }

    fn to_poly(&self, e: &Expr) -> Polynomial {
        match e {
            Expr::Const(c) => self.constant(*c),
            Expr::Var(_) => self.atom(e.clone()),
            Expr::Add(lhs, rhs) => self.add(self.to_poly(lhs), &self.to_poly(rhs)),
            Expr::Sub(lhs, rhs) => {
                let negated = self.to_poly(rhs).scale(-1.0, self.tol());
                self.add(self.to_poly(lhs), &negated)
            }
            Expr::Mul(lhs, rhs) => self.mul(&self.to_poly(lhs), &self.to_poly(rhs)),
            Expr::Div(num, den) => {
                let mut result = self.to_poly(num);
                for factor in flatten_mul(den) {
                    result = match factor {
                        Expr::Pow(base, exp) => match exp.as_ref() {
                            Expr::Const(c) => {
                                self.mul(&result, &self.pow_const(self.to_poly(base), -c))
                            }
                            _ => self.div(result, self.to_poly(factor)),
                        },
                        _ => self.div(result, self.to_poly(factor)),
                    };
                }
                result
            }
            Expr::Pow(base, exp) => self.pow_poly(self.to_poly(base), self.to_poly(exp)),
            Expr::Exp(arg) => self.exp_of(self.to_poly(arg)),
            Expr::Ln(arg) => self.ln_of(self.to_poly(arg)),
            Expr::sin(arg) => self.sin_of(self.to_poly(arg)),
            Expr::cos(arg) => self.cos_of(self.to_poly(arg)),
            Expr::tg(arg) => {
                let arg = self.to_poly(arg);
                let cos_inv = self.pow_const(self.cos_of(arg.clone()), -1.0);
                self.mul(&self.sin_of(arg), &cos_inv)
            }
            Expr::ctg(arg) => {
                let arg = self.to_poly(arg);
                let sin_inv = self.pow_const(self.sin_of(arg.clone()), -1.0);
                self.mul(&self.cos_of(arg), &sin_inv)
            }
            Expr::arcsin(arg) => self.fold_or_atom(arg, f64::asin, Expr::arcsin),
            Expr::arccos(arg) => self.fold_or_atom(arg, f64::acos, Expr::arccos),
            Expr::arctg(arg) => self.fold_or_atom(arg, f64::atan, Expr::arctg),
            Expr::arcctg(arg) => self.fold_or_atom(
                arg,
                |x| std::f64::consts::FRAC_PI_2 - x.atan(),
                Expr::arcctg,
            ),
            Expr::Func(name, args) => self.atom(Expr::Func(
                name.clone(),
                args.iter().map(|a| self.canonical(a)).collect(),
            )),
            Expr::Derivative(name, args, slots) => self.atom(Expr::Derivative(
                name.clone(),
                args.iter().map(|a| self.canonical(a)).collect(),
                slots.clone(),
            )),
            Expr::Diff(body, var) => {
                self.atom(Expr::Diff(self.canonical(body).boxed(), var.clone()))
            }
        }
    }

    fn fold_or_atom(&self, arg: &Expr, f: fn(f64) -> f64, ctor: fn(Box<Expr>) -> Expr) -> Polynomial {
        let arg = self.to_poly(arg);
        if let Some(c) = arg.as_constant() {
            let value = f(c);
            if value.is_finite() {
                return self.constant(value);
            }
        }
        self.atom(ctor(self.from_poly(&arg).boxed()))
    }

    fn add(&self, mut a: Polynomial, b: &Polynomial) -> Polynomial {
        for term in b.terms.values() {
            a.add_term(term.clone(), self.tol());
        }
        a
    }

    fn mul(&self, a: &Polynomial, b: &Polynomial) -> Polynomial {
        let mut result = Polynomial::zero();
        for ta in a.terms.values() {
            for tb in b.terms.values() {
                let product = self.normalize_term(ta.mul(tb));
                result = self.add(result, &product);
            }
        }
        result
    }

    fn div(&self, num: Polynomial, den: Polynomial) -> Polynomial {
        if den.terms.len() <= 1 {
            return self.mul(&num, &self.pow_const(den, -1.0));
        }
        if let Some(ratio) = num.ratio_to(&den) {
            return self.constant(ratio);
        }
        self.mul(&num, &self.sum_power(den, -1.0))
    }

    fn pow_poly(&self, base: Polynomial, exp: Polynomial) -> Polynomial {
        if let Some(c) = exp.as_constant() {
            return self.pow_const(base, c);
        }
        if let Some(b) = base.as_constant() {
            if b == std::f64::consts::E {
                return self.exp_of(exp);
            }
        }
        self.atom(Expr::Pow(
            self.from_poly(&base).boxed(),
            self.from_poly(&exp).boxed(),
        ))
    }

    fn pow_const(&self, base: Polynomial, c: f64) -> Polynomial {
        if c == 0.0 {
            return self.constant(1.0);
        }
        if c == 1.0 {
            return base;
        }
        if let Some(b) = base.as_constant() {
            let value = b.powf(c);
            if value.is_finite() {
                return self.constant(value);
            }
            return self.atom(Expr::Pow(Expr::Const(b).boxed(), Expr::Const(c).boxed()));
        }
        if let Some(term) = base.single_term() {
            if is_integer(c) {
                return self.normalize_term(raise_factors(term, c));
            }
            if term.coeff <= 0.0 {
                return self.root_power(&base, c);
            }
            let coeff = self.constant(term.coeff.powf(c));
            let monomial = Term {
                coeff: 1.0,
                factors: term.factors.clone(),
            };
            let combinable = monomial.factors.len() == 1
                && monomial.factors.values().all(|f| keeps_principal_branch(f));
            let powered = if combinable {
                self.normalize_term(raise_factors(&monomial, c))
            } else {
                self.root_power(&Polynomial::from_term(monomial, self.tol()), c)
            };
            return self.mul(&coeff, &powered);
        }
        if is_integer(c) && c > 1.0 && c <= self.settings.max_expand_power as f64 {
            let mut result = base.clone();
            for _ in 1..(c as u32) {
                result = self.mul(&result, &base);
            }
            return result;
        }
        self.sum_power(base, c)
    }

    /// `base^c` for a non-integer `c` that cannot be pushed into the factors of `base`:
    /// `base^floor(c)` times the atom `base^frac(c)`
    fn root_power(&self, base: &Polynomial, c: f64) -> Polynomial {
        let whole = c.floor();
        let root = self.atom(Expr::Pow(
            self.from_poly(base).boxed(),
            Expr::Const(snap(c - whole)).boxed(),
        ));
        if whole == 0.0 {
            root
        } else {
            self.mul(&self.pow_const(base.clone(), whole), &root)
        }
    }

    /// power of a sum kept as an atom; the sum is scaled so that its first term has coefficient 1
    fn sum_power(&self, base: Polynomial, c: f64) -> Polynomial {
        let lead = base.terms.values().next().map(|t| t.coeff).unwrap_or(1.0);
        if lead > 0.0 || is_integer(c) {
            let unit = base.scale(1.0 / lead, self.tol());
            let mut factors = BTreeMap::new();
            let base_expr = self.from_poly(&unit);
            factors.insert(
                base_expr.to_string(),
                Factor {
                    base: base_expr,
                    exponent: c,
                },
            );
            Polynomial::from_term(
                Term {
                    coeff: snap(lead.powf(c)),
                    factors,
                },
                self.tol(),
            )
        } else {
            self.atom_pow(self.from_poly(&base), c)
        }
    }

    fn exp_of(&self, arg: Polynomial) -> Polynomial {
        if let Some(c) = arg.as_constant() {
            return self.constant(c.exp());
        }
        if let Some(Expr::Ln(inner)) = plain_atom(&arg) {
            return self.to_poly(inner);
        }
        self.atom(Expr::Exp(self.from_poly(&arg).boxed()))
    }

    fn ln_of(&self, arg: Polynomial) -> Polynomial {
        if let Some(c) = arg.as_constant() {
            if c > 0.0 {
                return self.constant(c.ln());
            }
        }
        if let Some(Expr::Exp(inner)) = plain_atom(&arg) {
            return self.to_poly(inner);
        }
        self.atom(Expr::Ln(self.from_poly(&arg).boxed()))
    }

    /// integer multiple of a single term: returns (n, unit term)
    fn multiple_angle(&self, arg: &Polynomial) -> Option<(f64, Polynomial)> {
        let term = arg.single_term()?;
        let n = term.coeff;
        if is_integer(n) && n >= 2.0 && n <= self.settings.max_multiple_angle as f64 {
            let unit = Polynomial::from_term(
                Term {
                    coeff: 1.0,
                    factors: term.factors.clone(),
                },
                self.tol(),
            );
            Some((n, unit))
        } else {
            None
        }
    }

    fn leading_negative(arg: &Polynomial) -> bool {
        arg.single_term().map(|t| t.coeff < 0.0).unwrap_or(false)
    }

    fn sin_of(&self, arg: Polynomial) -> Polynomial {
        if let Some(c) = arg.as_constant() {
            return self.constant(c.sin());
        }
        if Self::leading_negative(&arg) {
            return self.sin_of(arg.scale(-1.0, self.tol())).scale(-1.0, self.tol());
        }
        if let Some((n, unit)) = self.multiple_angle(&arg) {
            // sin(na) = sin((n-1)a)cos(a) + cos((n-1)a)sin(a)
            let prev = unit.scale(n - 1.0, self.tol());
            let first = self.mul(&self.sin_of(prev.clone()), &self.cos_of(unit.clone()));
            let second = self.mul(&self.cos_of(prev), &self.sin_of(unit));
            return self.add(first, &second);
        }
        self.atom(Expr::sin(self.from_poly(&arg).boxed()))
    }

    fn cos_of(&self, arg: Polynomial) -> Polynomial {
        if let Some(c) = arg.as_constant() {
            return self.constant(c.cos());
        }
        if Self::leading_negative(&arg) {
            return self.cos_of(arg.scale(-1.0, self.tol()));
        }
        if let Some((n, unit)) = self.multiple_angle(&arg) {
            // cos(na) = cos((n-1)a)cos(a) - sin((n-1)a)sin(a)
            let prev = unit.scale(n - 1.0, self.tol());
            let first = self.mul(&self.cos_of(prev.clone()), &self.cos_of(unit.clone()));
            let second = self.mul(&self.sin_of(prev), &self.sin_of(unit));
            return self.add(first, &second.scale(-1.0, self.tol()));
        }
        self.atom(Expr::cos(self.from_poly(&arg).boxed()))
    }

    /// Rewrites a product term into canonical form: merges exponentials, expands sums
    /// raised to small integer powers and replaces cos(a)^2 by 1 - sin(a)^2.
    fn normalize_term(&self, term: Term) -> Polynomial {
        let tol = self.tol();
        // (b^q)^k with integer k is b^(q*k)
        let root_key = term
            .factors
            .iter()
            .find(|(_, f)| {
                is_integer(f.exponent)
                    && f.exponent != 1.0
                    && matches!(&f.base, Expr::Pow(_, q) if matches!(q.as_ref(), Expr::Const(_)))
            })
            .map(|(k, _)| k.clone());
        if let Some(key) = root_key {
            let mut rest = term.clone();
            if let Some(Factor {
                base: Expr::Pow(inner, q),
                exponent,
            }) = rest.factors.remove(&key)
            {
                if let Expr::Const(q) = *q {
                    let total = snap(q * exponent);
                    let inner = self.to_poly(&inner);
                    let raised = if is_integer(total) {
                        self.pow_const(inner, total)
                    } else {
                        self.root_power(&inner, total)
                    };
                    return self.mul(&Polynomial::from_term(rest, tol), &raised);
                }
            }
        }

        let exp_keys: Vec<String> = term
            .factors
            .iter()
            .filter(|(_, f)| matches!(f.base, Expr::Exp(_)))
            .map(|(k, _)| k.clone())
            .collect();
        let lone_exp = exp_keys.len() == 1
            && term.factors.get(&exp_keys[0]).map(|f| f.exponent) == Some(1.0);
        if !exp_keys.is_empty() && !lone_exp {
            let mut rest = term.clone();
            let mut arg = Polynomial::zero();
            for key in &exp_keys {
                if let Some(Factor {
                    base: Expr::Exp(inner),
                    exponent,
                }) = rest.factors.remove(key)
                {
                    arg = self.add(arg, &self.to_poly(&inner).scale(exponent, tol));
                }
            }
            return self.mul(&Polynomial::from_term(rest, tol), &self.exp_of(arg));
        }

        let sum_key = term
            .factors
            .iter()
            .find(|(_, f)| {
                matches!(f.base, Expr::Add(..) | Expr::Sub(..))
                    && is_integer(f.exponent)
                    && f.exponent >= 1.0
                    && f.exponent <= self.settings.max_expand_power as f64
            })
            .map(|(k, _)| k.clone());
        if let Some(key) = sum_key {
            let mut rest = term.clone();
            if let Some(factor) = rest.factors.remove(&key) {
                let expanded = self.pow_const(self.to_poly(&factor.base), factor.exponent);
                return self.mul(&Polynomial::from_term(rest, tol), &expanded);
            }
        }

        let cos_key = term
            .factors
            .iter()
            .find(|(_, f)| matches!(f.base, Expr::cos(_)) && is_integer(f.exponent) && f.exponent >= 2.0)
            .map(|(k, _)| k.clone());
        if let Some(key) = cos_key {
            let mut rest = term.clone();
            if let Some(Factor {
                base: Expr::cos(arg),
                exponent,
            }) = rest.factors.remove(&key)
            {
                if exponent > 2.0 {
                    rest.factors.insert(
                        key,
                        Factor {
                            base: Expr::cos(arg.clone()),
                            exponent: exponent - 2.0,
                        },
                    );
                }
                let sin_sq = self.atom_pow(Expr::sin(arg), 2.0);
                let one_minus_sin_sq = self.add(self.constant(1.0), &sin_sq.scale(-1.0, tol));
                return self.mul(&Polynomial::from_term(rest, tol), &one_minus_sin_sq);
            }
        }

        Polynomial::from_term(term, tol)
    }

    /// Expression form of a canonical polynomial: terms in monomial order with the numeric
    /// term last, negative powers collected in a denominator.
    fn from_poly(&self, p: &Polynomial) -> Expr {
        let symbolic = p.terms.values().filter(|t| !t.factors.is_empty());
        let numeric = p.terms.values().filter(|t| t.factors.is_empty());
        symbolic
            .chain(numeric)
            .map(term_to_expr)
            .reduce(|acc, term| Expr::Add(acc.boxed(), term.boxed()))
            .unwrap_or(Expr::Const(0.0))
    }
}

/// every factor exponent of `term` multiplied by `c`, the coefficient raised to `c`
fn raise_factors(term: &Term, c: f64) -> Term {
    let mut powered = Term::constant(snap(term.coeff.powf(c)));
    for (key, factor) in &term.factors {
        let exponent = snap(factor.exponent * c);
        if exponent != 0.0 {
            powered.factors.insert(
                key.clone(),
                Factor {
                    base: factor.base.clone(),
                    exponent,
                },
            );
        }
    }
    powered
}

/// `(b^p)^c = b^(p*c)` for every real `b` where the left side is defined
fn keeps_principal_branch(factor: &Factor) -> bool {
    matches!(factor.base, Expr::Exp(_)) || !is_integer(factor.exponent) || factor.exponent.abs() == 1.0
}

/// the atom of a polynomial that is exactly one atom to the first power
fn plain_atom(p: &Polynomial) -> Option<&Expr> {
    let term = p.single_term()?;
    if term.coeff != 1.0 || term.factors.len() != 1 {
        return None;
    }
    term.factors
        .values()
        .next()
        .filter(|f| f.exponent == 1.0)
        .map(|f| &f.base)
}

fn flatten_mul(expr: &Expr) -> Vec<&Expr> {
    match expr {
        Expr::Mul(lhs, rhs) => {
            let mut factors = flatten_mul(lhs);
            factors.extend(flatten_mul(rhs));
            factors
        }
        _ => vec![expr],
    }
}

fn power_expr(base: &Expr, exponent: f64) -> Expr {
    if exponent == 1.0 {
        base.clone()
    } else {
        Expr::Pow(base.clone().boxed(), Expr::Const(exponent).boxed())
    }
}

fn term_to_expr(term: &Term) -> Expr {
    let mut numerator: Vec<Expr> = Vec::new();
    let mut denominator: Vec<Expr> = Vec::new();
    for factor in term.factors.values() {
        if factor.exponent > 0.0 {
            numerator.push(power_expr(&factor.base, factor.exponent));
        } else {
            denominator.push(power_expr(&factor.base, -factor.exponent));
        }
    }
    let product = |factors: Vec<Expr>| {
        factors
            .into_iter()
            .reduce(|acc, f| Expr::Mul(acc.boxed(), f.boxed()))
    };
    let num = match product(numerator) {
        None => Expr::Const(term.coeff),
        Some(n) if term.coeff == 1.0 => n,
        Some(n) => Expr::Mul(Expr::Const(term.coeff).boxed(), n.boxed()),
    };
    match product(denominator) {
        None => num,
        Some(den) => Expr::Div(num.boxed(), den.boxed()),
    }
}

impl Expr {
    //___________________________________SIMPLIFICATION____________________________________

    /// Canonical form with the default settings.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let e = Expr::parse_expression("sin(x)^2 + cos(x)^2")?;
    /// assert_eq!(e.simplify(), Expr::Const(1.0));
    /// ```
    pub fn simplify(&self) -> Expr {
        self.simplify_with(&SimplifySettings::default())
    }

    pub fn simplify_with(&self, settings: &SimplifySettings) -> Expr {
        let canonicalizer = Canonicalizer { settings };
        canonicalizer.canonical(self)
    }

    /// true if `self - other` simplifies to zero
    pub fn is_equivalent(&self, other: &Expr) -> bool {
        (self.clone() - other.clone()).simplify().is_zero()
    }
}
