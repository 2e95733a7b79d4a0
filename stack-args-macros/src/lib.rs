use proc_macro::TokenStream;
use proc_macro2::{Literal, Span, TokenStream as TokenStream2};
use quote::{quote, quote_spanned, TokenStreamExt as _};
use rand::Rng as _;
use syn::{
    parse::Parser as _, parse_macro_input, punctuated::Punctuated, spanned::Spanned, BinOp,
    Error, Expr, FnArg, Ident, ItemFn, Lit, MetaNameValue, Token, UnOp,
};

extern crate proc_macro;

macro_rules! err {
    ($span:expr, $message:expr) => {
        Error::new($span.span(), $message).to_compile_error()
    };
    ($span:expr, $message:expr, $($args:expr),*) => {
        Error::new($span.span(), format!($message, $($args),*)).to_compile_error()
    };
}

/// `&[ArgView]` を受け取り [i32] を返す関数を、プロセスのエントリポイントにする。
///
/// C ランタイムから呼ばれる `main` シンボルを生成するので、使う側のクレートには
/// `#![no_main]` が必要。引数の領域はスタック上に確保され、関数の戻り値がそのまま
/// 終了ステータスになる。
///
/// 属性には次の引数を指定できる。
/// * `max_arena_bytes` - スタック上に取る領域の上限（整数の定数式）
/// * `mode` - `bump` または `single_shot`
///
/// ```ignore
/// #[stack_args::main(max_arena_bytes = 64 * 1024, mode = bump)]
/// fn main(args: &[stack_args::ArgView<'_>]) -> i32 {
///     0
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, input: TokenStream) -> TokenStream {
    // エラー原因を一括でできるだけたくさん表示するために、エラーを保存する変数
    let mut errors = TokenStream2::new();

    let config = parse_config(args.into(), &mut errors);

    let f = parse_macro_input!(input as ItemFn);

    if let Some(asyncness) = f.sig.asyncness {
        errors.append_all(err!(asyncness, "Entry should not be async"));
    }
    if let Some(constness) = f.sig.constness {
        errors.append_all(err!(constness, "Entry should not be const"));
    }
    if let Some(unsafety) = f.sig.unsafety {
        errors.append_all(err!(unsafety, "Entry should not be unsafe"));
    }
    if !f.sig.generics.params.is_empty() {
        errors.append_all(err!(f.sig.generics.params, "Entry should not be generic"));
    }

    // ここまでのエラーを一括で表示
    if !errors.is_empty() {
        return errors.into();
    }

    let signature_span = f.sig.span();

    let fn_ident = &f.sig.ident;
    let fn_inputs_types = f.sig.inputs.iter().map(|arg| match arg {
        FnArg::Receiver(arg) => quote!(#arg),
        FnArg::Typed(arg) => {
            let ty = &arg.ty;
            quote!(#ty)
        }
    });
    let fn_output_type = &f.sig.output;

    // 関数を `fn(&[ArgView]) -> i32` にキャストすることで、他の引数、戻り値の場合にエラーを出せる
    let fn_type_check = quote_spanned! {signature_span =>
        const _: fn(&[::stack_args::ArgView<'_>]) -> i32 =
            #fn_ident as fn(#(#fn_inputs_types),*) #fn_output_type;
    };

    // 利用側の関数名と被らないように乱数を加える
    let entry_ident = Ident::new(
        &format!("__stack_args_entry_{}", rand::thread_rng().gen::<u32>()),
        Span::call_site(),
    );

    let result = quote! {
        #fn_type_check

        /// C ランタイムから呼ばれるエントリポイント
        #[doc(hidden)]
        #[export_name = "main"]
        extern "C" fn #entry_ident(
            argc: ::core::ffi::c_int,
            argv: *const *const ::core::ffi::c_char,
        ) -> ::core::ffi::c_int {
            unsafe { ::stack_args::start_with(#config, argc, argv, #fn_ident) }
        }

        #f
    };
    result.into()
}

/// 属性の引数を `::stack_args::Config` を作る式に変換する。
/// 不正な引数は `errors` に追加し、その引数は無視する。
fn parse_config(args: TokenStream2, errors: &mut TokenStream2) -> TokenStream2 {
    let mut config = quote!(::stack_args::Config::DEFAULT);

    let pairs = match Punctuated::<MetaNameValue, Token![,]>::parse_terminated.parse2(args) {
        Ok(pairs) => pairs,
        Err(e) => {
            errors.append_all(e.to_compile_error());
            return config;
        }
    };

    for pair in pairs {
        let Some(name) = pair.path.get_ident() else {
            errors.append_all(err!(pair.path, "Unknown argument"));
            continue;
        };

        match name.to_string().as_str() {
            "max_arena_bytes" => match into_int(&pair.value) {
                Ok(bytes) if bytes > 0 => {
                    // usize に収まるかはコンパイラに任せる
                    let bytes = Literal::i128_unsuffixed(bytes);
                    config = quote!(#config.with_max_arena_bytes(#bytes));
                }
                Ok(_) => errors.append_all(err!(
                    pair.value,
                    "`max_arena_bytes` must be a positive integer"
                )),
                Err(e) => errors.append_all(e.to_compile_error()),
            },
            "mode" => {
                let mode = match &pair.value {
                    Expr::Path(path) => path.path.get_ident().map(|ident| ident.to_string()),
                    _ => None,
                };
                match mode.as_deref() {
                    Some("bump") => {
                        config = quote!(#config.with_mode(::stack_args::ArenaMode::Bump));
                    }
                    Some("single_shot") => {
                        config = quote!(#config.with_mode(::stack_args::ArenaMode::SingleShot));
                    }
                    _ => errors.append_all(err!(
                        pair.value,
                        "`mode` must be `bump` or `single_shot`"
                    )),
                }
            }
            other => errors.append_all(err!(
                name,
                "Unknown argument `{}`, expected `max_arena_bytes` or `mode`",
                other
            )),
        }
    }

    config
}

/// 式を変換して整数にする。
///
/// 変換できる式は四則演算とビット演算のみ。
/// 途中で桁あふれした場合もエラーになる。
fn into_int(expr: &Expr) -> Result<i128, Error> {
    match expr {
        Expr::Lit(lit) => match &lit.lit {
            Lit::Int(int) => int.base10_parse::<i128>(),
            _ => Err(Error::new(lit.span(), "Expected an integer")),
        },
        Expr::Unary(unary) => {
            let value = into_int(&unary.expr)?;
            match unary.op {
                UnOp::Neg(_) => value
                    .checked_neg()
                    .ok_or_else(|| Error::new(unary.span(), "Integer overflow")),
                _ => Err(Error::new(unary.op.span(), "Unsupported operator")),
            }
        }
        Expr::Binary(binary) => {
            let left = into_int(&binary.left)?;
            let right = into_int(&binary.right)?;
            let value = match binary.op {
                BinOp::Add(_) => left.checked_add(right),
                BinOp::Sub(_) => left.checked_sub(right),
                BinOp::Mul(_) => left.checked_mul(right),
                BinOp::Div(_) => left.checked_div(right),
                BinOp::Rem(_) => left.checked_rem(right),
                BinOp::BitAnd(_) => Some(left & right),
                BinOp::BitOr(_) => Some(left | right),
                BinOp::BitXor(_) => Some(left ^ right),
                BinOp::Shl(_) => u32::try_from(right)
                    .ok()
                    .and_then(|right| left.checked_shl(right)),
                BinOp::Shr(_) => u32::try_from(right)
                    .ok()
                    .and_then(|right| left.checked_shr(right)),
                _ => return Err(Error::new(binary.op.span(), "Unsupported operator")),
            };
            value.ok_or_else(|| Error::new(binary.span(), "Integer overflow"))
        }
        Expr::Paren(paren) => into_int(&paren.expr),
        Expr::Group(group) => into_int(&group.expr),
        _ => Err(Error::new(expr.span(), "Expected an integer expression")),
    }
}
